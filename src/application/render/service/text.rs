use crate::application::render::types::{NodeFamily, RenderError};
use crate::domain::{emoji::ShortcodeTable, ir::Inline};

use super::{emoji::expand_shortcodes, nested};

/// Plain text of an inline tree. Nothing is escaped: callers either
/// re-sanitise (heading slugs) or escape the result themselves.
pub(crate) fn inline_text(
    inline: &Inline,
    shortcodes: &dyn ShortcodeTable,
) -> Result<String, RenderError> {
    let mut buffer = String::new();
    push_inline_text(inline, shortcodes, &mut buffer, 0)?;
    Ok(buffer)
}

fn push_inline_text(
    inline: &Inline,
    shortcodes: &dyn ShortcodeTable,
    buffer: &mut String,
    depth: usize,
) -> Result<(), RenderError> {
    let depth = nested(depth)?;
    match inline {
        Inline::Text(text) => buffer.push_str(&expand_shortcodes(text, shortcodes)),
        Inline::Sequence(children) => {
            for child in children {
                push_inline_text(child, shortcodes, buffer, depth)?;
            }
        }
        Inline::Italic(content)
        | Inline::Bold(content)
        | Inline::Underline(content)
        | Inline::Strikethrough(content) => {
            push_inline_text(content, shortcodes, buffer, depth)?;
        }
        Inline::Code { content, .. } => buffer.push_str(content),
        Inline::Emoji { name } => match shortcodes.glyph(name) {
            Some(glyph) => buffer.push_str(glyph),
            None => {
                buffer.push(':');
                buffer.push_str(name);
                buffer.push(':');
            }
        },
        Inline::Link { url, label } => match label {
            Some(label) => push_inline_text(label, shortcodes, buffer, depth)?,
            None => buffer.push_str(url),
        },
        Inline::Image { alt, .. } => {
            if let Some(alt) = alt {
                push_inline_text(alt, shortcodes, buffer, depth)?;
            }
        }
        Inline::Raw { content } => buffer.push_str(content),
        Inline::Unsupported(node) => {
            return Err(RenderError::unsupported(NodeFamily::Inline, &node.kind));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application::render::service::MAX_NESTING_DEPTH;
    use crate::domain::ir::UnsupportedNode;

    fn table() -> HashMap<String, String> {
        HashMap::from([("tada".to_string(), "🎉".to_string())])
    }

    #[test]
    fn unwraps_styles_without_escaping() {
        let inline = Inline::Sequence(vec![
            Inline::text("a < "),
            Inline::bold(Inline::italic(Inline::text("b"))),
            Inline::Code {
                content: "<c>".to_string(),
                lang: None,
            },
            Inline::strikethrough(Inline::underline(Inline::text(" & d"))),
        ]);

        assert_eq!(inline_text(&inline, &table()).unwrap(), "a < b<c> & d");
    }

    #[test]
    fn emoji_references_resolve_to_glyphs() {
        let inline = Inline::Sequence(vec![
            Inline::text("Party :tada: "),
            Inline::emoji("tada"),
            Inline::emoji("nope"),
        ]);

        assert_eq!(inline_text(&inline, &table()).unwrap(), "Party 🎉 🎉:nope:");
    }

    #[test]
    fn links_yield_label_or_url_and_raw_is_verbatim() {
        let inline = Inline::Sequence(vec![
            Inline::link("https://a.example", Some(Inline::text("A"))),
            Inline::text(" "),
            Inline::link("https://b.example", None),
            Inline::raw("<br />"),
        ]);

        assert_eq!(
            inline_text(&inline, &table()).unwrap(),
            "A https://b.example<br />"
        );
    }

    #[test]
    fn unsupported_nodes_fail() {
        let inline = Inline::Unsupported(UnsupportedNode {
            kind: "spoiler".to_string(),
        });
        let err = inline_text(&inline, &table()).expect_err("unsupported");
        assert_eq!(err, RenderError::unsupported(NodeFamily::Inline, "spoiler"));
    }

    #[test]
    fn deep_nesting_is_refused() {
        let mut inline = Inline::text("x");
        for _ in 0..1_000 {
            inline = Inline::bold(inline);
        }
        let err = inline_text(&inline, &table()).expect_err("nesting limit");
        assert_eq!(err, RenderError::nesting_too_deep(MAX_NESTING_DEPTH));
    }
}
