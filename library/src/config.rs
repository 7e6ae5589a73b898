//! Catalog configuration
//!
//! Deserialized from the `[catalog]` section of `tailor.toml`. Every field
//! has a default so a partial (or missing) section still produces a usable
//! catalog.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::inspect::MANIFEST_EXTENSION;

/// A named asset library root directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetLibrary {
    /// Display name of the library.
    pub name: String,
    /// Directory scanned recursively for archives.
    pub root_path: PathBuf,
}

impl AssetLibrary {
    /// Create a library entry.
    pub fn new(name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
        }
    }
}

/// Catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Configured asset libraries (default: none)
    #[serde(default)]
    pub libraries: Vec<AssetLibrary>,
    /// Archive file extension, without the dot (default: "assetpack")
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,
    /// Cache directory override (default: the per-user cache directory)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Also treat archive modification times as part of staleness (default: false)
    #[serde(default)]
    pub track_modification_times: bool,
}

fn default_archive_extension() -> String {
    MANIFEST_EXTENSION.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            libraries: Vec::new(),
            archive_extension: default_archive_extension(),
            cache_dir: None,
            track_modification_times: false,
        }
    }
}
