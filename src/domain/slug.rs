//! Heading anchor slugs.
//!
//! Slugs keep letters, digits and emoji glyphs from the heading's plain text
//! (lowercased) and turn everything else into hyphens, so “Hello, World!”
//! becomes `hello-world` and “Déjà vu 🎉” becomes `déjà-vu-🎉`. Runs of
//! hyphens collapse to one and the ends are trimmed.

use std::collections::{HashMap, HashSet};

/// Derive the anchor slug for a heading's plain text.
pub fn heading_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for ch in text.chars() {
        if ch.is_alphanumeric() || is_emoji_char(ch) {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Whether a single codepoint is an emoji glyph on its own.
pub fn is_emoji_char(ch: char) -> bool {
    let mut buffer = [0u8; 4];
    emojis::get(ch.encode_utf8(&mut buffer)).is_some()
}

/// Deterministically generate unique anchor slugs within a single document.
///
/// Headings processed in order receive monotonic suffixes when duplicates
/// occur (e.g. `section`, `section-2`, `section-3`). A suffix is skipped when
/// another heading already owns that id, so `Setup`, `Setup`, `Setup 2`
/// yields `setup`, `setup-2`, `setup-2-2`. Empty slugs are returned as-is and
/// never counted.
#[derive(Default, Debug)]
pub struct AnchorSlugger {
    occurrences: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl AnchorSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for the provided heading text, unique within this slugger.
    pub fn anchor_for(&mut self, heading: &str) -> String {
        let base = heading_slug(heading);
        if base.is_empty() {
            return base;
        }

        let count = self.occurrences.entry(base.clone()).or_insert(0);
        let mut candidate = base.clone();
        loop {
            *count += 1;
            if *count > 1 {
                candidate = format!("{base}-{}", *count);
            }
            if !self.issued.contains(&candidate) {
                break;
            }
        }

        self.issued.insert(candidate.clone());
        candidate
    }
}
