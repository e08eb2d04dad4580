//! File-backed asset manifest.
//!
//! The manifest is a TOML table mapping asset identifiers to serving paths:
//!
//! ```toml
//! [assets]
//! logo = "/media/logo.png"
//! ```

use std::{fs, path::Path};

use tracing::debug;

use crate::domain::assets::AssetManifest;

use super::error::InfraError;

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<AssetManifest, InfraError> {
    let data = fs::read_to_string(path)?;
    let manifest = parse_manifest(&data).map_err(|message| InfraError::manifest(path, message))?;

    debug!(
        target = "infra::assets",
        path = %path.display(),
        entries = manifest.len(),
        "asset manifest loaded"
    );
    Ok(manifest)
}

fn parse_manifest(data: &str) -> Result<AssetManifest, String> {
    let manifest: AssetManifest = toml::from_str(data).map_err(|err| err.to_string())?;

    if let Some((identifier, _)) = manifest.iter().find(|(identifier, _)| {
        identifier.is_empty() || identifier.starts_with('$') || identifier.contains(char::is_whitespace)
    }) {
        return Err(format!(
            "identifier `{identifier}` must be non-empty, without `$` prefix or whitespace"
        ));
    }

    Ok(manifest)
}
