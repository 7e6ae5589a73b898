//! Archive inspection abstraction
//!
//! The catalog never interprets archive files itself. An [`ArchiveInspector`]
//! opens one archive in assets-only mode and reports what it contains; host
//! integrations provide their own inspector for their native archive format.
//!
//! [`ManifestInspector`] handles the portable asset-pack format: a JSON
//! document keyed by asset type name.
//!
//! ```json
//! {
//!   "materials": [{ "name": "Oak Planks", "tags": ["wood", "floor"] }],
//!   "worlds": [{ "name": "Overcast Sky" }]
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CatalogError, Result};
use crate::record::AssetType;

/// Maximum allowed asset-pack size for reading into memory.
pub const MAX_MANIFEST_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

/// Default file extension of asset-pack archives.
pub const MANIFEST_EXTENSION: &str = "assetpack";

/// One asset listed by an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Asset type.
    pub asset_type: AssetType,
    /// Asset name inside the archive.
    pub name: String,
    /// Tags attached to the asset.
    pub tags: BTreeSet<String>,
}

/// Everything an archive lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveContents {
    /// Listed assets, in archive order.
    pub entries: Vec<AssetEntry>,
}

impl ArchiveContents {
    /// Find an asset by type and name.
    pub fn find(&self, asset_type: AssetType, name: &str) -> Option<&AssetEntry> {
        self.entries
            .iter()
            .find(|e| e.asset_type == asset_type && e.name == name)
    }

    /// Number of listed assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive lists no assets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trait for format-specific archive inspectors.
///
/// Implementations must release anything they loaded before `inspect`
/// returns: a full rescan visits every archive once, in sequence, and only
/// one archive's contents should be alive at a time.
pub trait ArchiveInspector: Send + Sync {
    /// File extension of archives this inspector understands (without the dot).
    fn extension(&self) -> &str;

    /// List the assets in one archive.
    fn inspect(&self, path: &Path) -> Result<ArchiveContents>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    actions: Vec<ManifestAsset>,
    collections: Vec<ManifestAsset>,
    materials: Vec<ManifestAsset>,
    node_groups: Vec<ManifestAsset>,
    objects: Vec<ManifestAsset>,
    worlds: Vec<ManifestAsset>,
}

#[derive(Debug, Deserialize)]
struct ManifestAsset {
    name: String,
    #[serde(default)]
    tags: BTreeSet<String>,
}

impl Manifest {
    fn into_contents(self) -> ArchiveContents {
        let sections = [
            (AssetType::Actions, self.actions),
            (AssetType::Collections, self.collections),
            (AssetType::Materials, self.materials),
            (AssetType::NodeGroups, self.node_groups),
            (AssetType::Objects, self.objects),
            (AssetType::Worlds, self.worlds),
        ];
        let entries = sections
            .into_iter()
            .flat_map(|(asset_type, assets)| {
                assets.into_iter().map(move |a| AssetEntry {
                    asset_type,
                    name: a.name,
                    tags: a.tags,
                })
            })
            .collect();
        ArchiveContents { entries }
    }
}

/// Inspector for JSON asset-pack archives.
#[derive(Debug, Clone)]
pub struct ManifestInspector {
    extension: String,
}

impl ManifestInspector {
    /// Inspector for archives with the default `assetpack` extension.
    pub fn new() -> Self {
        Self::with_extension(MANIFEST_EXTENSION)
    }

    /// Inspector for asset packs stored under a different extension.
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }
}

impl Default for ManifestInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveInspector for ManifestInspector {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn inspect(&self, path: &Path) -> Result<ArchiveContents> {
        let metadata = std::fs::metadata(path).map_err(|e| CatalogError::inspect(path, e))?;
        if metadata.len() > MAX_MANIFEST_BYTES {
            return Err(CatalogError::inspect(
                path,
                format!(
                    "archive too large ({} bytes, max {} bytes)",
                    metadata.len(),
                    MAX_MANIFEST_BYTES
                ),
            ));
        }
        let bytes = std::fs::read(path).map_err(|e| CatalogError::inspect(path, e))?;
        let manifest: Manifest =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::inspect(path, e))?;
        Ok(manifest.into_contents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_lists_all_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.assetpack");
        std::fs::write(
            &path,
            r#"{
                "materials": [{"name": "Oak", "tags": ["wood"]}, {"name": "Steel"}],
                "worlds": [{"name": "Sky", "tags": ["outdoor", "day"]}],
                "comment": "unknown keys are ignored"
            }"#,
        )
        .unwrap();

        let contents = ManifestInspector::new().inspect(&path).unwrap();
        assert_eq!(contents.len(), 3);
        let oak = contents.find(AssetType::Materials, "Oak").unwrap();
        assert!(oak.tags.contains("wood"));
        assert!(contents.find(AssetType::Materials, "Steel").unwrap().tags.is_empty());
        assert!(contents.find(AssetType::Objects, "Oak").is_none());
    }

    #[test]
    fn test_manifest_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.assetpack");
        std::fs::write(&path, "not json {{").unwrap();
        assert!(matches!(
            ManifestInspector::new().inspect(&path),
            Err(CatalogError::Inspect { .. })
        ));
    }

    #[test]
    fn test_manifest_missing_file() {
        let result = ManifestInspector::new().inspect(Path::new("/nonexistent/pack.assetpack"));
        assert!(matches!(result, Err(CatalogError::Inspect { .. })));
    }

    #[test]
    fn test_custom_extension() {
        assert_eq!(ManifestInspector::with_extension("json").extension(), "json");
        assert_eq!(ManifestInspector::default().extension(), "assetpack");
    }
}
