//! CommonMark parse tree → IR.
//!
//! This is the only module that knows comrak's node types. Every node kind it
//! meets maps to exactly one IR node; a kind without a mapping fails the
//! conversion instead of being dropped. comrak builds arbitrarily deep trees
//! without recursing, so the walk here stops at `MAX_NESTING_DEPTH`.

use comrak::{
    Arena,
    nodes::{AstNode, ListType, NodeValue},
    options::Options,
    parse_document,
};

use crate::application::render::types::{NodeFamily, RenderError};
use crate::domain::ir::{Block, Document, Inline};

use super::nested;

const LINE_BREAK: &str = "<br />";

/// Parse markup and convert the resulting tree.
pub(crate) fn markup_to_document(
    source: &str,
    options: &Options<'_>,
) -> Result<Document, RenderError> {
    let arena = Arena::new();
    let root = parse_document(&arena, source, options);
    convert_document(root)
}

pub(crate) fn convert_document<'a>(root: &'a AstNode<'a>) -> Result<Document, RenderError> {
    convert_blocks(root, 0)
}

fn convert_blocks<'a>(parent: &'a AstNode<'a>, depth: usize) -> Result<Vec<Block>, RenderError> {
    parent
        .children()
        .map(|child| convert_block(child, depth))
        .collect()
}

fn convert_block<'a>(node: &'a AstNode<'a>, depth: usize) -> Result<Block, RenderError> {
    let depth = nested(depth)?;
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Document => Ok(Block::Sequence(convert_blocks(node, depth)?)),
        NodeValue::Paragraph => Ok(Block::Paragraph(convert_inlines(node, depth)?)),
        NodeValue::Heading(heading) => Ok(Block::Heading {
            level: u32::from(heading.level),
            content: convert_inlines(node, depth)?,
        }),
        NodeValue::CodeBlock(code) => Ok(Block::Code {
            content: Inline::text(code.literal.clone()),
            lang: code.info.split_whitespace().next().map(str::to_string),
        }),
        NodeValue::HtmlBlock(html) => Ok(Block::raw(html.literal.clone())),
        NodeValue::ThematicBreak => Ok(Block::HorizontalRule),
        NodeValue::BlockQuote => Ok(Block::BlockQuote(convert_blocks(node, depth)?)),
        NodeValue::List(list) => Ok(Block::List {
            ordered: matches!(list.list_type, ListType::Ordered),
            items: node
                .children()
                .map(|item| convert_item(item, depth))
                .collect::<Result<Vec<_>, _>>()?,
        }),
        other => Err(RenderError::unsupported(
            NodeFamily::Markup,
            other.xml_node_name(),
        )),
    }
}

/// The item wrapper itself has no IR node; its children are the item.
fn convert_item<'a>(node: &'a AstNode<'a>, depth: usize) -> Result<Vec<Block>, RenderError> {
    let depth = nested(depth)?;
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Item(_) => convert_blocks(node, depth),
        other => Err(RenderError::unsupported(
            NodeFamily::Markup,
            other.xml_node_name(),
        )),
    }
}

/// Children of `parent` as one inline sequence. Adjacent text nodes are joined
/// so that shortcodes split by the inline parser are still seen whole.
fn convert_inlines<'a>(parent: &'a AstNode<'a>, depth: usize) -> Result<Inline, RenderError> {
    let mut inlines: Vec<Inline> = Vec::new();

    for child in parent.children() {
        let converted = convert_inline(child, depth)?;
        if let (Some(Inline::Text(previous)), Inline::Text(text)) =
            (inlines.last_mut(), &converted)
        {
            previous.push_str(text);
            continue;
        }
        inlines.push(converted);
    }

    Ok(Inline::Sequence(inlines))
}

fn convert_inline<'a>(node: &'a AstNode<'a>, depth: usize) -> Result<Inline, RenderError> {
    let depth = nested(depth)?;
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Text(text) => Ok(Inline::text(text.to_string())),
        NodeValue::Emph => Ok(Inline::italic(convert_inlines(node, depth)?)),
        // Strong emphasis keeps the emphasis wrapper as well.
        NodeValue::Strong => Ok(Inline::bold(Inline::italic(convert_inlines(node, depth)?))),
        NodeValue::Strikethrough => Ok(Inline::strikethrough(convert_inlines(node, depth)?)),
        NodeValue::Underline => Ok(Inline::underline(convert_inlines(node, depth)?)),
        NodeValue::Code(code) => Ok(Inline::Code {
            content: code.literal.clone(),
            lang: None,
        }),
        NodeValue::HtmlInline(html) => Ok(Inline::raw(html.clone())),
        NodeValue::Link(link) => Ok(Inline::link(
            link.url.clone(),
            Some(convert_inlines(node, depth)?),
        )),
        NodeValue::Image(link) => Ok(Inline::image(
            link.url.clone(),
            Some(convert_inlines(node, depth)?),
        )),
        NodeValue::LineBreak | NodeValue::SoftBreak => Ok(Inline::raw(LINE_BREAK)),
        other => Err(RenderError::unsupported(
            NodeFamily::Markup,
            other.xml_node_name(),
        )),
    }
}
