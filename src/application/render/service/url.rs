use std::collections::HashMap;

use metrics::counter;
use tracing::warn;

use crate::domain::assets::AssetLookup;

const ASSET_MARKER: char = '$';
pub(crate) const METRIC_ASSET_UNRESOLVED_TOTAL: &str = "kazani_render_asset_unresolved_total";

/// Rewrites `$identifier` URLs into serving paths for the span of one render.
///
/// Results are memoised per identifier so a document that references the same
/// upload many times queries the store once. A resolver is never reused across
/// renders.
pub(crate) struct UrlResolver<'a> {
    assets: &'a dyn AssetLookup,
    resolved: HashMap<String, String>,
}

impl<'a> UrlResolver<'a> {
    pub(crate) fn new(assets: &'a dyn AssetLookup) -> Self {
        Self {
            assets,
            resolved: HashMap::new(),
        }
    }

    /// Resolve a raw URL. Unknown identifiers become the empty string; URLs
    /// without the marker are returned unchanged.
    pub(crate) fn resolve(&mut self, url: &str) -> String {
        let Some(identifier) = url.strip_prefix(ASSET_MARKER) else {
            return url.to_string();
        };

        if let Some(path) = self.resolved.get(identifier) {
            return path.clone();
        }

        let path = match self.assets.serving_path(identifier) {
            Some(path) => path,
            None => {
                warn!(
                    target = "application::render::url",
                    identifier, "asset reference did not resolve; emitting empty URL"
                );
                counter!(METRIC_ASSET_UNRESOLVED_TOTAL).increment(1);
                String::new()
            }
        };

        self.resolved.insert(identifier.to_string(), path.clone());
        path
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::assets::{AssetManifest, NoAssets};

    #[test]
    fn resolves_known_identifiers() {
        let manifest = AssetManifest::new().with("logo", "/media/logo.png");
        let mut resolver = UrlResolver::new(&manifest);
        assert_eq!(resolver.resolve("$logo"), "/media/logo.png");
    }

    #[test]
    fn unknown_identifiers_degrade_to_empty() {
        let mut resolver = UrlResolver::new(&NoAssets);
        assert_eq!(resolver.resolve("$missing"), "");
    }

    #[test]
    fn other_urls_pass_through_unchanged() {
        let mut resolver = UrlResolver::new(&NoAssets);
        assert_eq!(
            resolver.resolve("https://example.com/a b?c=$d"),
            "https://example.com/a b?c=$d"
        );
        assert_eq!(resolver.resolve("javascript:alert(1)"), "javascript:alert(1)");
        assert_eq!(resolver.resolve(""), "");
    }

    #[test]
    fn repeated_identifiers_hit_the_store_once() {
        let calls = AtomicUsize::new(0);
        let lookup = |identifier: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            (identifier == "logo").then(|| "/media/logo.png".to_string())
        };

        let mut resolver = UrlResolver::new(&lookup);
        for _ in 0..3 {
            assert_eq!(resolver.resolve("$logo"), "/media/logo.png");
            assert_eq!(resolver.resolve("$gone"), "");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
