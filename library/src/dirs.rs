//! Cache directory abstraction for per-user paths

use std::path::PathBuf;

/// Trait for providing the directory that holds the catalog cache.
///
/// Hosts embedding the catalog can point it at their own storage; tests
/// point it at a temporary directory.
///
/// # Example
///
/// ```rust
/// use std::path::PathBuf;
/// use tailor_library::CacheDirProvider;
///
/// struct ScratchCacheDir(PathBuf);
///
/// impl CacheDirProvider for ScratchCacheDir {
///     fn cache_dir(&self) -> Option<PathBuf> {
///         Some(self.0.clone())
///     }
/// }
/// ```
pub trait CacheDirProvider: Send + Sync {
    /// Returns the cache directory path.
    ///
    /// Returns `None` if the home directory cannot be determined.
    fn cache_dir(&self) -> Option<PathBuf>;
}

/// Per-user platform cache directory.
///
/// On Windows: `%LOCALAPPDATA%\Tailor\cache`
/// On macOS: `~/Library/Caches/io.tailor.Tailor`
/// On Linux: `~/.cache/Tailor`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCacheDir;

impl CacheDirProvider for DefaultCacheDir {
    fn cache_dir(&self) -> Option<PathBuf> {
        directories::ProjectDirs::from("io.tailor", "", "Tailor")
            .map(|dirs| dirs.cache_dir().to_path_buf())
    }
}

/// A cache directory fixed at construction.
#[derive(Debug, Clone)]
pub struct FixedCacheDir(pub PathBuf);

impl CacheDirProvider for FixedCacheDir {
    fn cache_dir(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Tailor\config`
/// On macOS: `~/Library/Application Support/io.tailor.Tailor`
/// On Linux: `~/.config/Tailor`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.tailor", "", "Tailor")
        .map(|dirs| dirs.config_dir().to_path_buf())
}
