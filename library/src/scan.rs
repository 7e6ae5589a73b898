//! Archive discovery under library roots

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use crate::config::AssetLibrary;

/// Recursively list archives with `extension` under `root`.
///
/// A missing or unreadable root yields an empty set; unreadable entries
/// below the root are skipped with a warning.
pub fn archives_under(root: &Path, extension: &str) -> BTreeSet<PathBuf> {
    if !root.is_dir() {
        tracing::warn!("Asset library root {} does not exist", root.display());
        return BTreeSet::new();
    }

    let mut found = BTreeSet::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            found.insert(entry.into_path());
        }
    }
    found
}

/// Every archive across all configured libraries.
pub fn archives_in(libraries: &[AssetLibrary], extension: &str) -> BTreeSet<PathBuf> {
    libraries
        .iter()
        .flat_map(|lib| archives_under(&lib.root_path, extension))
        .collect()
}

/// Modification time of each file, in whole seconds since the Unix epoch.
///
/// Files whose metadata can no longer be read are omitted, which makes them
/// compare unequal to any recorded time.
pub fn modification_times<'a>(
    files: impl IntoIterator<Item = &'a PathBuf>,
) -> BTreeMap<PathBuf, u64> {
    files
        .into_iter()
        .filter_map(|path| {
            let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
            let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
            Some((path.clone(), secs))
        })
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
