//! Persistent catalog cache
//!
//! The cache is a single JSON document per library configuration holding the
//! set of archives seen by the last scan and every record found in them.
//! Writes go through a temporary file and a rename so a reader never sees a
//! half-written document from this process. Nothing coordinates concurrent
//! writers from separate processes: the last rename wins.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::AssetLibrary;
use crate::error::{CatalogError, Result};
use crate::record::AssetRecord;

/// Current cache document format version.
pub const CACHE_VERSION: u32 = 1;

/// Everything the catalog persists between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// Document format version.
    pub version: u32,
    /// When the snapshot was built.
    pub built_at: DateTime<Utc>,
    /// Archives seen by the scan that built this snapshot.
    pub known_source_files: BTreeSet<PathBuf>,
    /// Archive modification times (seconds since the Unix epoch), when tracked.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub modified_times: BTreeMap<PathBuf, u64>,
    /// Records keyed by their fully-qualified id.
    pub assets: BTreeMap<String, AssetRecord>,
}

impl CacheSnapshot {
    /// An empty snapshot stamped with the current time.
    pub fn new() -> Self {
        Self {
            version: CACHE_VERSION,
            built_at: Utc::now(),
            known_source_files: BTreeSet::new(),
            modified_times: BTreeMap::new(),
            assets: BTreeMap::new(),
        }
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for CacheSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage backend for cache snapshots.
pub trait CacheStore: Send + Sync {
    /// Read the stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing usable is stored yet (no document, or
    /// a document from another format version).
    fn load(&self) -> Result<Option<CacheSnapshot>>;

    /// Replace the stored snapshot in a single commit.
    fn save(&self, snapshot: &CacheSnapshot) -> Result<()>;

    /// Where the snapshot lives, if it lives on disk.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Stable key for a library configuration.
///
/// Order-independent: the libraries are sorted before hashing.
pub fn cache_key(libraries: &[AssetLibrary]) -> u64 {
    let mut sorted: Vec<&AssetLibrary> = libraries.iter().collect();
    sorted.sort();

    let mut material = String::new();
    for lib in sorted {
        material.push_str(&lib.name);
        material.push('\0');
        material.push_str(&lib.root_path.to_string_lossy());
        material.push('\n');
    }
    xxh3_64(material.as_bytes())
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// JSON document store.
#[derive(Debug, Clone)]
pub struct JsonCacheStore {
    path: PathBuf,
}

impl JsonCacheStore {
    /// Store backed by the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `libraries` inside `cache_dir`, named after their [`cache_key`].
    pub fn for_libraries(cache_dir: &Path, libraries: &[AssetLibrary]) -> Self {
        Self::new(cache_dir.join(format!("asset_cache_{:016x}.json", cache_key(libraries))))
    }

    /// Path of the cache document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> Result<PathBuf> {
        match self.path.file_name() {
            Some(name) => {
                let mut tmp_name = OsString::from(name);
                tmp_name.push(".tmp");
                Ok(self.path.with_file_name(tmp_name))
            }
            None => Err(CatalogError::cache_io(
                &self.path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "cache path has no file name",
                ),
            )),
        }
    }
}

impl CacheStore for JsonCacheStore {
    fn load(&self) -> Result<Option<CacheSnapshot>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CatalogError::cache_io(&self.path, e)),
        };

        let probe: VersionProbe =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::CacheFormat {
                path: self.path.clone(),
                source,
            })?;
        if probe.version != CACHE_VERSION {
            tracing::info!(
                "Ignoring cache document {} with format version {} (expected {})",
                self.path.display(),
                probe.version,
                CACHE_VERSION
            );
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CatalogError::CacheFormat {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, snapshot: &CacheSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CatalogError::cache_io(parent, e))?;
        }

        let out =
            serde_json::to_vec_pretty(snapshot).map_err(|source| CatalogError::CacheFormat {
                path: self.path.clone(),
                source,
            })?;

        let tmp_path = self.tmp_path()?;
        {
            let mut f = fs::File::create(&tmp_path).map_err(|e| CatalogError::cache_io(&tmp_path, e))?;
            f.write_all(&out)
                .and_then(|_| f.sync_all())
                .map_err(|e| CatalogError::cache_io(&tmp_path, e))?;
        }

        #[cfg(windows)]
        {
            if self.path.exists() {
                // Windows rename fails if destination exists.
                fs::remove_file(&self.path).map_err(|e| CatalogError::cache_io(&self.path, e))?;
            }
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| CatalogError::cache_io(&self.path, e))
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AssetType;
    use tempfile::TempDir;

    fn sample_snapshot() -> CacheSnapshot {
        let record = AssetRecord {
            name: "Oak".to_string(),
            library_name: "Studio".to_string(),
            asset_type: AssetType::Materials,
            tags: ["wood".to_string()].into_iter().collect(),
            source_file: PathBuf::from("/lib/oak.assetpack"),
        };
        let mut snapshot = CacheSnapshot::new();
        snapshot
            .known_source_files
            .insert(PathBuf::from("/lib/oak.assetpack"));
        snapshot.assets.insert(record.id().to_string(), record);
        snapshot
    }

    #[test]
    fn test_missing_document_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonCacheStore::new(dir.path().join("cache.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_is_exact() {
        let dir = TempDir::new().unwrap();
        let store = JsonCacheStore::new(dir.path().join("nested").join("cache.json"));
        let snapshot = sample_snapshot();

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
        assert!(!dir.path().join("nested").join("cache.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_document_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ truncated").unwrap();
        assert!(matches!(
            JsonCacheStore::new(&path).load(),
            Err(CatalogError::CacheFormat { .. })
        ));
    }

    #[test]
    fn test_other_version_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"version": 99, "anything": "else"}"#).unwrap();
        assert_eq!(JsonCacheStore::new(&path).load().unwrap(), None);
    }

    #[test]
    fn test_cache_key_ignores_library_order() {
        let a = AssetLibrary::new("A", "/a");
        let b = AssetLibrary::new("B", "/b");
        assert_eq!(
            cache_key(&[a.clone(), b.clone()]),
            cache_key(&[b.clone(), a.clone()])
        );
        assert_ne!(cache_key(&[a.clone()]), cache_key(&[a, b]));
    }

    #[test]
    fn test_for_libraries_names_document_by_key() {
        let libs = [AssetLibrary::new("A", "/a")];
        let store = JsonCacheStore::for_libraries(Path::new("/tmp/cache"), &libs);
        let expected = format!("asset_cache_{:016x}.json", cache_key(&libs));
        assert_eq!(store.path(), Path::new("/tmp/cache").join(expected));
    }
}
