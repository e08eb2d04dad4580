use crate::application::render::types::{NodeFamily, RenderError};
use crate::domain::ir::Inline;

use super::{block::HtmlRenderer, escape::escape_html, nested, text::inline_text};

impl HtmlRenderer<'_> {
    /// Flatten an inline tree sitting `depth` levels into the document into
    /// escaped HTML.
    pub(super) fn flatten_inline(
        &mut self,
        inline: &Inline,
        depth: usize,
    ) -> Result<String, RenderError> {
        let mut html = String::new();
        self.push_inline(inline, &mut html, depth)?;
        Ok(html)
    }

    fn push_inline(
        &mut self,
        inline: &Inline,
        html: &mut String,
        depth: usize,
    ) -> Result<(), RenderError> {
        let depth = nested(depth)?;
        match inline {
            Inline::Text(text) => html.push_str(&self.emoji.tag_text(text)),
            Inline::Sequence(children) => {
                for child in children {
                    self.push_inline(child, html, depth)?;
                }
            }
            Inline::Italic(content) => self.push_wrapped("em", content, html, depth)?,
            Inline::Bold(content) => self.push_wrapped("strong", content, html, depth)?,
            Inline::Underline(content) => self.push_wrapped("u", content, html, depth)?,
            Inline::Strikethrough(content) => self.push_wrapped("s", content, html, depth)?,
            // Language hints are accepted for a future highlighter; none runs today.
            Inline::Code { content, .. } => {
                html.push_str("<code>");
                html.push_str(&escape_html(content));
                html.push_str("</code>");
            }
            Inline::Emoji { name } => match self.emoji.shortcode_image(name) {
                Some(tag) => html.push_str(&tag),
                None => {
                    html.push(':');
                    html.push_str(&escape_html(name));
                    html.push(':');
                }
            },
            Inline::Link { url, label } => {
                let href = escape_html(&self.urls.resolve(url));
                html.push_str("<a href=\"");
                html.push_str(&href);
                html.push_str("\">");
                match label {
                    Some(label) => self.push_inline(label, html, depth)?,
                    None => html.push_str(&escape_html(url)),
                }
                html.push_str("</a>");
            }
            Inline::Image { source, alt } => {
                let src = escape_html(&self.urls.resolve(source));
                let alt = match alt {
                    Some(alt) => escape_html(&inline_text(alt, self.emoji.shortcodes())?),
                    None => String::new(),
                };
                html.push_str("<img src=\"");
                html.push_str(&src);
                html.push_str("\" alt=\"");
                html.push_str(&alt);
                html.push_str("\"/>");
            }
            Inline::Raw { content } => html.push_str(content),
            Inline::Unsupported(node) => {
                return Err(RenderError::unsupported(NodeFamily::Inline, &node.kind));
            }
        }

        Ok(())
    }

    fn push_wrapped(
        &mut self,
        tag: &str,
        content: &Inline,
        html: &mut String,
        depth: usize,
    ) -> Result<(), RenderError> {
        html.push('<');
        html.push_str(tag);
        html.push('>');
        self.push_inline(content, html, depth)?;
        html.push_str("</");
        html.push_str(tag);
        html.push('>');
        Ok(())
    }
}
