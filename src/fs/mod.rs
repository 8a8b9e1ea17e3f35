//! Filesystem path sanitization and safe recursive tree operations.
//!
//! [`TreeOps`] holds an [`IoConfig`] with the sanitization tables and default
//! modes; every public operation cleans its path arguments first and re-reads
//! directory listings on each traversal. Operations are synchronous and do no
//! locking of their own, so check-then-act sequences are racy under external
//! mutation of the same paths.

mod list;
mod path;
mod tree;

use std::fs;
use std::path::{Path, PathBuf};

pub use list::ExtFilter;

use crate::config::IoConfig;
use crate::error::{Error, Result};

/// Filesystem engine over a set of sanitization tables and default modes.
#[derive(Debug, Clone, Default)]
pub struct TreeOps {
    config: IoConfig,
}

impl TreeOps {
    /// Create an engine with the given configuration.
    pub fn new(config: IoConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &IoConfig {
        &self.config
    }

    /// Validates and cleans a caller-supplied path.
    ///
    /// Non-UTF-8 and relative paths are rejected; the returned path is the
    /// cleaned rendition every operation works against.
    pub(crate) fn checked_path(&self, path: &Path) -> Result<PathBuf> {
        let raw = path
            .to_str()
            .ok_or_else(|| Error::invalid_argument("path is not valid UTF-8"))?;
        Ok(PathBuf::from(self.clean_dir(raw)?))
    }
}

/// Directory entries sorted ascending by name, regardless of readdir order.
pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::io("directory could not be opened", dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io("directory could not be read", dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Applies a Unix mode; a no-op on other platforms.
#[cfg(unix)]
pub(crate) fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::io("mode could not be applied", path, e))
}

#[cfg(not(unix))]
pub(crate) fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
