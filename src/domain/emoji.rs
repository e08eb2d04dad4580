//! Emoji shortcode tables.

use std::collections::HashMap;

/// Maps a shortcode name (without colons) to its native glyph.
pub trait ShortcodeTable: Send + Sync {
    fn glyph(&self, name: &str) -> Option<&str>;
}

/// The gemoji shortcode set shipped with the `emojis` crate (`smile`,
/// `tada`, `+1`, …).
#[derive(Debug, Clone, Copy, Default)]
pub struct GemojiShortcodes;

impl ShortcodeTable for GemojiShortcodes {
    fn glyph(&self, name: &str) -> Option<&str> {
        emojis::get_by_shortcode(name).map(|emoji| emoji.as_str())
    }
}

impl ShortcodeTable for HashMap<String, String> {
    fn glyph(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}
