//! Disk-cached asset catalog
//!
//! The catalog answers "which assets of this type carry these tags" across
//! every configured library without opening archives on each query. It
//! keeps a [`CacheSnapshot`] in a [`CacheStore`] and rescans the libraries
//! only when the set of archives on disk differs from the one the snapshot
//! was built from.
//!
//! Staleness compares archive paths only. An archive whose contents change
//! in place keeps serving its old records until some archive is added or
//! removed, unless modification-time tracking is switched on.

use std::path::PathBuf;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::cache::{CacheSnapshot, CacheStore, JsonCacheStore};
use crate::config::{AssetLibrary, CatalogConfig};
use crate::dirs::CacheDirProvider;
use crate::error::{CatalogError, Result};
use crate::inspect::{ArchiveInspector, AssetEntry, ManifestInspector};
use crate::record::{AssetRecord, AssetType};
use crate::scan;

/// Asset catalog over a fixed set of libraries.
pub struct AssetCatalog {
    libraries: Vec<AssetLibrary>,
    inspector: Box<dyn ArchiveInspector>,
    store: Box<dyn CacheStore>,
    track_modification_times: bool,
}

impl AssetCatalog {
    /// Create a catalog from explicit parts.
    pub fn new(
        libraries: Vec<AssetLibrary>,
        inspector: impl ArchiveInspector + 'static,
        store: impl CacheStore + 'static,
    ) -> Self {
        Self {
            libraries,
            inspector: Box::new(inspector),
            store: Box::new(store),
            track_modification_times: false,
        }
    }

    /// Create a catalog from configuration, using the JSON asset-pack format.
    ///
    /// The cache document goes into `config.cache_dir` when set, otherwise
    /// into the directory `dirs` reports.
    pub fn from_config(config: &CatalogConfig, dirs: &dyn CacheDirProvider) -> Result<Self> {
        let cache_dir = config
            .cache_dir
            .clone()
            .or_else(|| dirs.cache_dir())
            .ok_or(CatalogError::NoCacheDir)?;
        let store = JsonCacheStore::for_libraries(&cache_dir, &config.libraries);
        let inspector = ManifestInspector::with_extension(config.archive_extension.clone());

        Ok(Self::new(config.libraries.clone(), inspector, store)
            .with_modification_times(config.track_modification_times))
    }

    /// Also treat changed archive modification times as staleness.
    pub fn with_modification_times(mut self, track: bool) -> Self {
        self.track_modification_times = track;
        self
    }

    /// Configured libraries.
    pub fn libraries(&self) -> &[AssetLibrary] {
        &self.libraries
    }

    /// The backing cache store.
    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// Whether the stored snapshot no longer matches the libraries on disk.
    ///
    /// A missing snapshot is stale. Otherwise the snapshot is stale when an
    /// archive was added or removed since it was built (and, with tracking
    /// on, when an archive's modification time changed).
    pub fn is_cache_stale(&self) -> Result<bool> {
        let snapshot = self.store.load()?;
        Ok(self.stale_against(snapshot.as_ref()))
    }

    fn stale_against(&self, snapshot: Option<&CacheSnapshot>) -> bool {
        let Some(snapshot) = snapshot else {
            tracing::debug!("No asset cache stored yet");
            return true;
        };

        let current = scan::archives_in(&self.libraries, self.inspector.extension());
        if current != snapshot.known_source_files {
            let added = current.difference(&snapshot.known_source_files).count();
            let removed = snapshot.known_source_files.difference(&current).count();
            tracing::debug!("Asset cache stale: {} archives added, {} removed", added, removed);
            return true;
        }

        if self.track_modification_times
            && scan::modification_times(&current) != snapshot.modified_times
        {
            tracing::debug!("Asset cache stale: archive modification times changed");
            return true;
        }

        false
    }

    /// Rescan every library and replace the stored snapshot.
    ///
    /// Archives that fail to inspect are logged and skipped; they still count
    /// as known so the next staleness check does not rescan for them again.
    /// Only a failure to write the snapshot aborts the rebuild.
    pub fn rebuild_cache(&self) -> Result<CacheSnapshot> {
        let mut snapshot = CacheSnapshot::new();
        let mut skipped = 0usize;

        for library in &self.libraries {
            let archives = scan::archives_under(&library.root_path, self.inspector.extension());
            tracing::debug!(
                "Scanning {} archives in library '{}'",
                archives.len(),
                library.name
            );

            for path in archives {
                // Contents are dropped at the end of each iteration, so only one
                // archive's listing is held at a time.
                match self.inspector.inspect(&path) {
                    Ok(contents) => {
                        for entry in contents.entries {
                            let record = AssetRecord {
                                name: entry.name,
                                library_name: library.name.clone(),
                                asset_type: entry.asset_type,
                                tags: entry.tags,
                                source_file: path.clone(),
                            };
                            let id = record.id().to_string();
                            if snapshot.assets.contains_key(&id) {
                                tracing::warn!(
                                    "Duplicate asset {} in {}, keeping the first",
                                    id,
                                    path.display()
                                );
                                continue;
                            }
                            snapshot.assets.insert(id, record);
                        }
                    }
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!("Skipping archive: {}", e);
                    }
                }
                snapshot.known_source_files.insert(path);
            }
        }

        if self.track_modification_times {
            snapshot.modified_times = scan::modification_times(&snapshot.known_source_files);
        }

        self.store.save(&snapshot)?;
        tracing::info!(
            "Rebuilt asset cache: {} assets from {} archives ({} skipped)",
            snapshot.assets.len(),
            snapshot.known_source_files.len(),
            skipped
        );
        Ok(snapshot)
    }

    /// The stored snapshot, rebuilt first if stale.
    pub fn snapshot(&self) -> Result<CacheSnapshot> {
        let stored = self.store.load()?;
        match stored {
            Some(snapshot) if !self.stale_against(Some(&snapshot)) => {
                tracing::debug!("Asset cache hit ({} assets)", snapshot.assets.len());
                Ok(snapshot)
            }
            _ => self.rebuild_cache(),
        }
    }

    /// Records of `asset_type` carrying every tag in `required_tags`, ordered by id.
    pub fn list_assets<S: AsRef<str>>(
        &self,
        asset_type: AssetType,
        required_tags: &[S],
    ) -> Result<Vec<AssetRecord>> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .assets
            .into_values()
            .filter(|r| r.asset_type == asset_type && r.has_tags(required_tags))
            .collect())
    }

    /// Every cached record, ordered by id.
    pub fn all_assets(&self) -> Result<Vec<AssetRecord>> {
        Ok(self.snapshot()?.assets.into_values().collect())
    }

    /// Re-open the record's archive and return its current entry.
    ///
    /// Fails with [`CatalogError::AssetNotFound`] when the archive no longer
    /// lists the asset. The cache is left untouched either way.
    pub fn load_asset(&self, record: &AssetRecord) -> Result<AssetEntry> {
        let contents = self.inspector.inspect(&record.source_file)?;
        contents
            .find(record.asset_type, &record.name)
            .cloned()
            .ok_or_else(|| CatalogError::AssetNotFound {
                name: record.name.clone(),
                asset_type: record.asset_type.as_str(),
                source_file: record.source_file.clone(),
            })
    }

    /// One matching record chosen uniformly at random, or `None` if nothing matches.
    pub fn sample_asset<R: Rng + ?Sized, S: AsRef<str>>(
        &self,
        rng: &mut R,
        asset_type: AssetType,
        required_tags: &[S],
    ) -> Result<Option<AssetRecord>> {
        let matches = self.list_assets(asset_type, required_tags)?;
        Ok(matches.choose(rng).cloned())
    }

    /// Path of the cache document, when the store is file-backed.
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.store.location().map(|p| p.to_path_buf())
    }
}

impl std::fmt::Debug for AssetCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCatalog")
            .field("libraries", &self.libraries)
            .field("extension", &self.inspector.extension())
            .field("cache", &self.store.location())
            .field("track_modification_times", &self.track_modification_times)
            .finish()
    }
}
