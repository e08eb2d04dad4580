//! Asset lookup capability used to resolve `$identifier` references.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resolves an upload identifier to the path it is served from.
///
/// Implementations may hit a slow store; the renderer calls them at most once
/// per distinct identifier within a single render.
pub trait AssetLookup: Send + Sync {
    fn serving_path(&self, identifier: &str) -> Option<String>;
}

impl<F> AssetLookup for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn serving_path(&self, identifier: &str) -> Option<String> {
        self(identifier)
    }
}

/// Lookup that knows no assets. Every reference degrades to an empty URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetLookup for NoAssets {
    fn serving_path(&self, _identifier: &str) -> Option<String> {
        None
    }
}

/// In-memory identifier → serving path table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    assets: BTreeMap<String, String>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, path: impl Into<String>) {
        self.assets.insert(identifier.into(), path.into());
    }

    pub fn with(mut self, identifier: impl Into<String>, path: impl Into<String>) -> Self {
        self.insert(identifier, path);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assets
            .iter()
            .map(|(identifier, path)| (identifier.as_str(), path.as_str()))
    }
}

impl AssetLookup for AssetManifest {
    fn serving_path(&self, identifier: &str) -> Option<String> {
        self.assets.get(identifier).cloned()
    }
}

impl FromIterator<(String, String)> for AssetManifest {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            assets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_resolves_known_identifiers_only() {
        let manifest = AssetManifest::new().with("logo", "/media/logo.png");

        assert_eq!(
            manifest.serving_path("logo").as_deref(),
            Some("/media/logo.png")
        );
        assert_eq!(manifest.serving_path("missing"), None);
    }

    #[test]
    fn closures_act_as_lookups() {
        let lookup = |identifier: &str| (identifier == "a").then(|| "/a".to_string());
        assert_eq!(lookup.serving_path("a").as_deref(), Some("/a"));
        assert_eq!(lookup.serving_path("b"), None);
    }
}
