use crate::application::render::types::{NodeFamily, RenderError};
use crate::domain::{
    assets::AssetLookup,
    emoji::ShortcodeTable,
    ir::{Block, Inline},
    slug::AnchorSlugger,
};

use super::{
    emoji::EmojiTagger, escape::escape_html, nested, text::inline_text, url::UrlResolver,
};

/// Per-render HTML writer. Holds the only state a render needs (memoised asset
/// paths and the heading slugs seen so far) and is dropped with the render.
pub(crate) struct HtmlRenderer<'a> {
    pub(super) urls: UrlResolver<'a>,
    pub(super) emoji: EmojiTagger<'a>,
    slugger: AnchorSlugger,
    permalink_symbol: &'a str,
}

impl<'a> HtmlRenderer<'a> {
    pub(crate) fn new(
        assets: &'a dyn AssetLookup,
        shortcodes: &'a dyn ShortcodeTable,
        emoji_cdn_base: &'a str,
        permalink_symbol: &'a str,
    ) -> Self {
        Self {
            urls: UrlResolver::new(assets),
            emoji: EmojiTagger::new(shortcodes, emoji_cdn_base),
            slugger: AnchorSlugger::new(),
            permalink_symbol,
        }
    }

    pub(crate) fn render_blocks(&mut self, blocks: &[Block]) -> Result<String, RenderError> {
        let mut html = String::new();
        for block in blocks {
            self.push_block(block, &mut html, 0)?;
        }
        Ok(html)
    }

    fn push_block(
        &mut self,
        block: &Block,
        html: &mut String,
        depth: usize,
    ) -> Result<(), RenderError> {
        let depth = nested(depth)?;
        match block {
            Block::Sequence(children) => {
                for child in children {
                    self.push_block(child, html, depth)?;
                }
            }
            Block::Paragraph(content) => {
                html.push_str("<p>");
                html.push_str(&self.flatten_inline(content, depth)?);
                html.push_str("</p>");
            }
            Block::Heading { level, content } => {
                self.push_heading(*level, content, html, depth)?;
            }
            Block::Subtext(content) => {
                html.push_str("<p class=\"subtext\">");
                html.push_str(&self.flatten_inline(content, depth)?);
                html.push_str("</p>");
            }
            Block::Raw { content } => html.push_str(content),
            // No highlighter runs; the language only becomes a class hook.
            Block::Code { content, lang } => {
                let code = escape_html(&inline_text(content, self.emoji.shortcodes())?);
                match lang {
                    Some(lang) => {
                        html.push_str("<pre><code class=\"lang-");
                        html.push_str(&escape_html(lang));
                        html.push_str("\">");
                    }
                    None => html.push_str("<pre><code>"),
                }
                html.push_str(&code);
                html.push_str("</code></pre>");
            }
            Block::HorizontalRule => html.push_str("<hr />"),
            Block::BlockQuote(children) => {
                html.push_str("<blockquote>");
                for child in children {
                    self.push_block(child, html, depth)?;
                }
                html.push_str("</blockquote>");
            }
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                html.push('<');
                html.push_str(tag);
                html.push('>');
                for item in items {
                    html.push_str("<li>");
                    for child in item {
                        self.push_block(child, html, depth)?;
                    }
                    html.push_str("</li>");
                }
                html.push_str("</");
                html.push_str(tag);
                html.push('>');
            }
            Block::Unsupported(node) => {
                return Err(RenderError::unsupported(NodeFamily::Block, &node.kind));
            }
        }

        Ok(())
    }

    fn push_heading(
        &mut self,
        level: u32,
        content: &Inline,
        html: &mut String,
        depth: usize,
    ) -> Result<(), RenderError> {
        let text = inline_text(content, self.emoji.shortcodes())?;
        let slug = escape_html(&self.slugger.anchor_for(&text));
        let inner = self.flatten_inline(content, depth)?;
        let rank = Block::heading_rank(level);

        html.push_str(&format!(
            "<h{rank} id=\"{slug}\">{inner}<a class=\"permalink\" href=\"#{slug}\">{}</a></h{rank}>",
            escape_html(self.permalink_symbol)
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application::render::service::MAX_NESTING_DEPTH;
    use crate::domain::{assets::NoAssets, ir::UnsupportedNode};

    fn render(blocks: &[Block]) -> Result<String, RenderError> {
        let table: HashMap<String, String> = HashMap::new();
        HtmlRenderer::new(&NoAssets, &table, "/e/", "#").render_blocks(blocks)
    }

    fn raw_item(text: &str) -> Vec<Block> {
        vec![Block::raw(text)]
    }

    #[test]
    fn heading_gets_slug_and_permalink() {
        let html = render(&[Block::heading(1, Inline::text("Hello, World!"))]).unwrap();
        assert_eq!(
            html,
            "<h2 id=\"hello-world\">Hello, World!<a class=\"permalink\" href=\"#hello-world\">#</a></h2>"
        );
    }

    #[test]
    fn heading_levels_are_clamped() {
        let html = render(&[Block::heading(10, Inline::text("Deep"))]).unwrap();
        assert!(html.starts_with("<h6 id=\"deep\">"));
        assert!(html.ends_with("</h6>"));
    }

    #[test]
    fn duplicate_headings_get_distinct_anchors() {
        let html = render(&[
            Block::heading(2, Inline::text("Setup")),
            Block::heading(2, Inline::text("Setup")),
        ])
        .unwrap();
        assert!(html.contains("id=\"setup\""));
        assert!(html.contains("id=\"setup-2\""));
        assert!(html.contains("href=\"#setup-2\""));
    }

    #[test]
    fn lists_choose_tag_from_ordering() {
        let ordered = Block::List {
            ordered: true,
            items: vec![raw_item("a"), raw_item("b")],
        };
        let unordered = Block::List {
            ordered: false,
            items: vec![raw_item("a"), raw_item("b")],
        };

        assert_eq!(render(&[ordered]).unwrap(), "<ol><li>a</li><li>b</li></ol>");
        assert_eq!(render(&[unordered]).unwrap(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn list_items_may_hold_several_blocks() {
        let list = Block::List {
            ordered: false,
            items: vec![vec![
                Block::paragraph(Inline::text("one")),
                Block::paragraph(Inline::text("two")),
            ]],
        };
        assert_eq!(
            render(&[list]).unwrap(),
            "<ul><li><p>one</p><p>two</p></li></ul>"
        );
    }

    #[test]
    fn code_blocks_escape_plain_text_and_mark_language() {
        let plain = Block::Code {
            content: Inline::text("if a < b {}\n"),
            lang: None,
        };
        let tagged = Block::Code {
            content: Inline::text("x && y"),
            lang: Some("rust".to_string()),
        };

        assert_eq!(
            render(&[plain]).unwrap(),
            "<pre><code>if a &lt; b {}\n</code></pre>"
        );
        assert_eq!(
            render(&[tagged]).unwrap(),
            "<pre><code class=\"lang-rust\">x &amp;&amp; y</code></pre>"
        );
    }

    #[test]
    fn containers_and_simple_blocks() {
        let blocks = vec![
            Block::Subtext(Inline::text("small")),
            Block::HorizontalRule,
            Block::BlockQuote(vec![Block::paragraph(Inline::text("quoted"))]),
            Block::Sequence(vec![Block::raw("<div>trusted</div>")]),
        ];
        assert_eq!(
            render(&blocks).unwrap(),
            "<p class=\"subtext\">small</p><hr /><blockquote><p>quoted</p></blockquote><div>trusted</div>"
        );
    }

    #[test]
    fn deep_block_nesting_is_refused() {
        let mut block = Block::paragraph(Inline::text("x"));
        for _ in 0..1_000 {
            block = Block::BlockQuote(vec![block]);
        }
        assert_eq!(
            render(&[block]).expect_err("nesting limit"),
            RenderError::nesting_too_deep(MAX_NESTING_DEPTH)
        );
    }

    #[test]
    fn unsupported_block_is_fatal() {
        let blocks = vec![
            Block::paragraph(Inline::text("before")),
            Block::Unsupported(UnsupportedNode {
                kind: "table".to_string(),
            }),
        ];
        assert_eq!(
            render(&blocks).expect_err("must fail"),
            RenderError::unsupported(NodeFamily::Block, "table")
        );
    }
}
