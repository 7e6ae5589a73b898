//! Error types for the asset catalog.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while maintaining or querying the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Reading or writing the cache store failed.
    #[error("cache I/O error at {path}: {source}")]
    CacheIo {
        /// File the operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cache document could not be decoded or encoded.
    #[error("cache document {path} is malformed: {source}")]
    CacheFormat {
        /// The cache document.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// No per-user cache directory could be determined.
    #[error("no cache directory available (home directory unknown)")]
    NoCacheDir,

    /// An archive could not be inspected.
    #[error("failed to inspect {path}: {message}")]
    Inspect {
        /// The archive.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The archive a record points at no longer lists that asset.
    #[error("no {asset_type} asset named '{name}' found in {source_file}")]
    AssetNotFound {
        /// Asset name.
        name: String,
        /// Asset type name.
        asset_type: &'static str,
        /// Archive that was searched.
        source_file: PathBuf,
    },

    /// A string did not name one of the six asset types.
    #[error("unknown asset type '{0}'")]
    UnknownAssetType(String),
}

impl CatalogError {
    pub(crate) fn cache_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::CacheIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn inspect(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        CatalogError::Inspect {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
