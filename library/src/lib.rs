//! Tailor asset library catalog
//!
//! Discovers assets (materials, objects, worlds and the rest) inside archive
//! files under a set of library roots and keeps their metadata in a
//! per-user disk cache so repeated queries skip the expensive scan.
//!
//! ```rust,no_run
//! use tailor_library::{AssetCatalog, AssetType, CatalogConfig, DefaultCacheDir};
//!
//! # fn main() -> tailor_library::Result<()> {
//! let catalog = AssetCatalog::from_config(&CatalogConfig::default(), &DefaultCacheDir)?;
//! for record in catalog.list_assets(AssetType::Worlds, &["outdoor"])? {
//!     println!("{record}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod dirs;
pub mod error;
pub mod inspect;
pub mod record;
pub mod scan;

pub use cache::{CACHE_VERSION, CacheSnapshot, CacheStore, JsonCacheStore, cache_key};
pub use catalog::AssetCatalog;
pub use config::{AssetLibrary, CatalogConfig};
pub use dirs::{CacheDirProvider, DefaultCacheDir, FixedCacheDir, config_dir};
pub use error::{CatalogError, Result};
pub use inspect::{ArchiveContents, ArchiveInspector, AssetEntry, ManifestInspector};
pub use record::{AssetId, AssetRecord, AssetType};
