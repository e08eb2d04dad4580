//! Emoji shortcode expansion and glyph → image tagging.
//!
//! Both passes walk the input once, left to right, appending to a fresh
//! buffer. Match positions are always taken from the input text, so a
//! replacement can never shift a later match.

use metrics::counter;
use tracing::warn;

use crate::domain::emoji::ShortcodeTable;

use super::escape::escape_html;

pub const DEFAULT_EMOJI_CDN_BASE: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/twemoji/15.1.0/svg/";
pub(crate) const METRIC_SHORTCODE_MISS_TOTAL: &str = "kazani_render_shortcode_miss_total";

/// Longest emoji sequence tried at one position, in codepoints. Family and
/// flag-tag sequences stay well below this.
const MAX_SEQUENCE_CHARS: usize = 12;

pub(crate) struct EmojiTagger<'a> {
    shortcodes: &'a dyn ShortcodeTable,
    cdn_base: &'a str,
}

impl<'a> EmojiTagger<'a> {
    pub(crate) fn new(shortcodes: &'a dyn ShortcodeTable, cdn_base: &'a str) -> Self {
        Self {
            shortcodes,
            cdn_base,
        }
    }

    pub(crate) fn shortcodes(&self) -> &'a dyn ShortcodeTable {
        self.shortcodes
    }

    /// Plain text → escaped HTML with shortcodes expanded and every glyph
    /// tagged. Expansion runs before escaping so table glyphs are escaped
    /// like the rest of the text.
    pub(crate) fn tag_text(&self, text: &str) -> String {
        let expanded = expand_shortcodes(text, self.shortcodes);
        self.tag_glyphs(&escape_html(&expanded))
    }

    /// Image markup for a shortcode reference, or `None` when the table has
    /// no entry for `name`.
    pub(crate) fn shortcode_image(&self, name: &str) -> Option<String> {
        match self.shortcodes.glyph(name) {
            Some(glyph) => Some(self.image_tag(glyph)),
            None => {
                warn!(
                    target = "application::render::emoji",
                    name, "unknown emoji shortcode; emitting literal text"
                );
                counter!(METRIC_SHORTCODE_MISS_TOTAL).increment(1);
                None
            }
        }
    }

    /// Replace each native emoji sequence with its CDN image.
    pub(crate) fn tag_glyphs(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        while cursor < text.len() {
            if let Some(end) = emoji_sequence_end(text, cursor) {
                output.push_str(&self.image_tag(&text[cursor..end]));
                cursor = end;
                continue;
            }

            let Some(ch) = text[cursor..].chars().next() else {
                break;
            };
            output.push(ch);
            cursor += ch.len_utf8();
        }

        output
    }

    pub(crate) fn image_tag(&self, glyph: &str) -> String {
        let label = escape_html(glyph);
        format!(
            "<img class=\"emoji\" src=\"{}{}.svg\" alt=\"{label}\" aria-label=\"{label}\" draggable=\"false\" />",
            self.cdn_base,
            codepoint_stem(glyph)
        )
    }
}

/// Expand `:name:` shortcodes found in `text`. Unknown names are left as they
/// are and their closing colon may open the next candidate.
pub(crate) fn expand_shortcodes(text: &str, shortcodes: &dyn ShortcodeTable) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(':') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let name_len = after_open
            .find(|ch: char| !is_shortcode_char(ch))
            .unwrap_or(after_open.len());
        let name = &after_open[..name_len];

        if name_len > 0 && after_open[name_len..].starts_with(':') {
            if let Some(glyph) = shortcodes.glyph(name) {
                output.push_str(glyph);
                rest = &after_open[name_len + 1..];
                continue;
            }
        }

        output.push(':');
        rest = after_open;
    }

    output.push_str(rest);
    output
}

fn is_shortcode_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '+')
}

/// Byte offset just past the longest emoji sequence starting at `start`.
fn emoji_sequence_end(text: &str, start: usize) -> Option<usize> {
    let tail = &text[start..];
    let mut chars = tail.chars();
    let first = chars.next()?;

    // ASCII only starts a sequence as a keycap base (`#️⃣`, `1️⃣`, …).
    if first.is_ascii() && chars.next().is_none_or(|next| next.is_ascii()) {
        return None;
    }

    let boundaries: Vec<usize> = tail
        .char_indices()
        .skip(1)
        .map(|(offset, _)| offset)
        .chain(std::iter::once(tail.len()))
        .take(MAX_SEQUENCE_CHARS)
        .collect();

    boundaries
        .into_iter()
        .rev()
        .find(|&end| emojis::get(&tail[..end]).is_some())
        .map(|end| start + end)
}

/// `😀` → `1f600`, `👍🏽` → `1f44d-1f3fd`.
fn codepoint_stem(glyph: &str) -> String {
    glyph
        .chars()
        .map(|ch| format!("{:x}", u32::from(ch)))
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::emoji::GemojiShortcodes;

    fn table() -> HashMap<String, String> {
        HashMap::from([
            ("wave".to_string(), "👋".to_string()),
            ("+1".to_string(), "👍".to_string()),
        ])
    }

    #[test]
    fn expands_known_shortcodes_only() {
        let table = table();
        assert_eq!(expand_shortcodes("hi :wave: :nope:", &table), "hi 👋 :nope:");
        assert_eq!(expand_shortcodes(":+1::wave:", &table), "👍👋");
    }

    #[test]
    fn colon_after_a_miss_can_open_the_next_shortcode() {
        let table = table();
        assert_eq!(expand_shortcodes("12:30:wave:", &table), "12:30👋");
        assert_eq!(expand_shortcodes("a: b", &table), "a: b");
        assert_eq!(expand_shortcodes("::", &table), "::");
    }

    #[test]
    fn empty_table_leaves_smile_literal() {
        let table: HashMap<String, String> = HashMap::new();
        let tagger = EmojiTagger::new(&table, DEFAULT_EMOJI_CDN_BASE);
        assert_eq!(tagger.tag_text(":smile:"), ":smile:");
        assert_eq!(tagger.shortcode_image("smile"), None);
    }

    #[test]
    fn table_glyphs_cannot_inject_markup() {
        let table = HashMap::from([("evil".to_string(), "<b>\"x\"</b>".to_string())]);
        let tagger = EmojiTagger::new(&table, "/e/");

        let html = tagger.tag_text("a :evil: < b");
        assert_eq!(html, "a &lt;b&gt;&quot;x&quot;&lt;/b&gt; &lt; b");

        let image = tagger.shortcode_image("evil").expect("table entry");
        assert!(image.contains("alt=\"&lt;b&gt;&quot;x&quot;&lt;/b&gt;\""));
        assert!(!image.contains("<b>"));
    }

    #[test]
    fn glyphs_become_cdn_images() {
        let tagger = EmojiTagger::new(&GemojiShortcodes, "/e/");
        assert_eq!(
            tagger.tag_glyphs("a😀b"),
            "a<img class=\"emoji\" src=\"/e/1f600.svg\" alt=\"😀\" aria-label=\"😀\" draggable=\"false\" />b"
        );
    }

    #[test]
    fn successive_glyphs_are_all_tagged_in_order() {
        let tagger = EmojiTagger::new(&GemojiShortcodes, "/e/");
        let html = tagger.tag_glyphs("😀 x 🎉🎉");

        let first = html.find("1f600").expect("first glyph tagged");
        let second = html.find("1f389").expect("second glyph tagged");
        assert!(first < second);
        assert_eq!(html.matches("<img").count(), 3);
        assert!(html.contains(" /> x <img"));
    }

    #[test]
    fn modifier_sequences_stay_one_image() {
        let tagger = EmojiTagger::new(&GemojiShortcodes, "/e/");
        let html = tagger.tag_glyphs("👍🏽");
        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains("src=\"/e/1f44d-1f3fd.svg\""));
    }

    #[test]
    fn plain_ascii_and_entities_are_untouched() {
        let tagger = EmojiTagger::new(&GemojiShortcodes, "/e/");
        let text = "x &lt; 1 # * 2 &amp; done";
        assert_eq!(tagger.tag_glyphs(text), text);
    }

    #[test]
    fn codepoints_are_lowercase_hex_without_padding() {
        assert_eq!(codepoint_stem("😀"), "1f600");
        assert_eq!(codepoint_stem("©"), "a9");
    }
}
