//! Recursive directory tree operations.
//!
//! Copy, move, rename, and delete share a recursive-descent pattern: the
//! public method validates and cleans its arguments once, the inner variant
//! trusts the paths it derives while walking. A failed recursive copy or
//! move can leave a partially populated destination; no rollback is
//! attempted.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

use super::{set_mode, sorted_entries, TreeOps};

impl TreeOps {
    /// Creates `dir` and any missing ancestors with the configured
    /// directory mode. Idempotent when `dir` already exists.
    pub fn make_dir(&self, dir: &Path) -> Result<()> {
        let mode = self.config().dir_mode;
        self.make_dir_with_mode(dir, mode)
    }

    /// Creates `dir` and any missing ancestors, applying `mode` to each
    /// newly created level. Fails with `Runtime` when a level collides with
    /// an existing file or cannot be created.
    pub fn make_dir_with_mode(&self, dir: &Path, mode: u32) -> Result<()> {
        let dir = self.checked_path(dir)?;
        self.make_dir_inner(&dir, mode)
    }

    pub(crate) fn make_dir_inner(&self, dir: &Path, mode: u32) -> Result<()> {
        let mut current = PathBuf::new();

        for component in dir.components() {
            current.push(component);
            if matches!(component, Component::RootDir | Component::Prefix(_)) {
                continue;
            }
            if current.symlink_metadata().is_ok() {
                continue;
            }
            fs::create_dir(&current)
                .map_err(|e| Error::io("directory could not be made", &current, e))?;
            set_mode(&current, mode)?;
            tracing::debug!(path = %current.display(), mode, "created directory");
        }

        if !dir.is_dir() {
            return Err(Error::runtime(format!(
                "not a directory: {}",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Recursively copies a file, directory, or symbolic link.
    ///
    /// Directories copy child by child with the same `overwrite` flag,
    /// creating the destination when missing. A file copy fails when the
    /// destination is a directory, or exists without `overwrite`.
    pub fn copy(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        let from = self.checked_path(from)?;
        let to = self.checked_path(to)?;
        self.copy_inner(&from, &to, overwrite)
    }

    fn copy_inner(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        let meta = from
            .symlink_metadata()
            .map_err(|e| Error::io("source not found", from, e))?;

        if meta.is_dir() {
            match to.symlink_metadata() {
                Ok(_) => {
                    if !to.is_dir() {
                        return Err(Error::runtime(format!(
                            "destination is not a directory: {}",
                            to.display()
                        )));
                    }
                }
                Err(_) => self.make_dir_inner(to, self.config().dir_mode)?,
            }

            for entry in sorted_entries(from)? {
                self.copy_inner(&entry.path(), &to.join(entry.file_name()), overwrite)?;
            }

            return Ok(());
        }

        if to.is_dir() {
            return Err(Error::runtime(format!(
                "destination is a directory: {}",
                to.display()
            )));
        }

        let to_exists = to.symlink_metadata().is_ok();
        if to_exists && !overwrite {
            return Err(Error::runtime(format!(
                "destination already exists: {}",
                to.display()
            )));
        }

        if let Some(parent) = to.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                self.make_dir_inner(parent, self.config().dir_mode)?;
            }
        }

        if meta.file_type().is_symlink() {
            if to_exists {
                fs::remove_file(to)
                    .map_err(|e| Error::io("destination could not be replaced", to, e))?;
            }
            copy_symlink(from, to)?;
        } else {
            fs::copy(from, to).map_err(|e| Error::io("source could not be copied", from, e))?;
        }

        tracing::debug!(from = %from.display(), to = %to.display(), "copied");
        Ok(())
    }

    /// Recursively moves a file, directory, or symbolic link.
    ///
    /// Directories move child by child, then the source directory is removed
    /// only if it ended up empty, so a partial failure never orphans
    /// remaining children silently. Files delegate to [`rename`].
    ///
    /// [`rename`]: TreeOps::rename
    pub fn move_entry(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        let from = self.checked_path(from)?;
        let to = self.checked_path(to)?;
        self.move_inner(&from, &to, overwrite)
    }

    fn move_inner(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        let meta = from
            .symlink_metadata()
            .map_err(|e| Error::io("source does not exist", from, e))?;

        if meta.is_dir() {
            match to.symlink_metadata() {
                Ok(_) => {
                    if !to.is_dir() {
                        return Err(Error::runtime(format!(
                            "destination is not a directory: {}",
                            to.display()
                        )));
                    }
                }
                Err(_) => self.make_dir_inner(to, self.config().dir_mode)?,
            }

            for entry in sorted_entries(from)? {
                self.move_inner(&entry.path(), &to.join(entry.file_name()), overwrite)?;
            }

            let mut children = fs::read_dir(from)
                .map_err(|e| Error::io("directory could not be opened", from, e))?;
            if children.next().is_none() {
                fs::remove_dir(from)
                    .map_err(|e| Error::io("directory could not be deleted", from, e))?;
                tracing::debug!(path = %from.display(), "removed emptied source directory");
            }

            return Ok(());
        }

        self.rename_inner(from, to, overwrite)
    }

    /// Renames a file or directory.
    ///
    /// Fails when the source is missing. An existing destination fails
    /// without `overwrite`, fails when its kind differs from the source, and
    /// is deleted first otherwise. A missing destination gets its parent
    /// directory created.
    pub fn rename(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        let from = self.checked_path(from)?;
        let to = self.checked_path(to)?;
        self.rename_inner(&from, &to, overwrite)
    }

    fn rename_inner(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        let from_meta = from
            .symlink_metadata()
            .map_err(|e| Error::io("source does not exist", from, e))?;

        match to.symlink_metadata() {
            Ok(to_meta) => {
                if !overwrite {
                    return Err(Error::runtime(format!(
                        "destination already exists: {}",
                        to.display()
                    )));
                }
                if from_meta.is_dir() != to_meta.is_dir() {
                    return Err(Error::runtime(format!(
                        "destination kind differs from source: {}",
                        to.display()
                    )));
                }
                self.delete_inner(to)?;
            }
            Err(_) => {
                if let Some(parent) = to.parent() {
                    if !parent.as_os_str().is_empty() {
                        self.make_dir_inner(parent, self.config().dir_mode)?;
                    }
                }
            }
        }

        fs::rename(from, to).map_err(|e| Error::io("source could not be renamed", from, e))?;
        tracing::debug!(from = %from.display(), to = %to.display(), "renamed");
        Ok(())
    }

    /// Deletes a file, symbolic link, or directory tree.
    ///
    /// Directories are emptied depth-first before removal. Fails with
    /// `Runtime` when the path is missing or any step fails.
    pub fn delete(&self, path: &Path) -> Result<()> {
        let path = self.checked_path(path)?;
        self.delete_inner(&path)
    }

    pub(crate) fn delete_inner(&self, path: &Path) -> Result<()> {
        let meta = path
            .symlink_metadata()
            .map_err(|e| Error::io("path not found", path, e))?;

        if !meta.is_dir() {
            fs::remove_file(path).map_err(|e| Error::io("file could not be deleted", path, e))?;
            tracing::debug!(path = %path.display(), "deleted file");
            return Ok(());
        }

        for entry in sorted_entries(path)? {
            self.delete_inner(&entry.path())?;
        }

        fs::remove_dir(path).map_err(|e| Error::io("directory could not be deleted", path, e))?;
        tracing::debug!(path = %path.display(), "deleted directory");
        Ok(())
    }

    /// Deletes every descendant of `dir` but leaves `dir` itself in place.
    /// Silently does nothing when `dir` is not a directory.
    pub fn delete_contents(&self, dir: &Path) -> Result<()> {
        let dir = self.checked_path(dir)?;

        if !dir.is_dir() {
            return Ok(());
        }

        for entry in sorted_entries(&dir)? {
            self.delete_inner(&entry.path())?;
        }

        Ok(())
    }

    /// For every direct child name in `match_dir`, deletes the same-named
    /// entry under `delete_dir` recursively. Only direct children are
    /// matched; no deep structural comparison happens.
    pub fn delete_matching(&self, delete_dir: &Path, match_dir: &Path) -> Result<()> {
        let delete_dir = self.checked_path(delete_dir)?;
        let match_dir = self.checked_path(match_dir)?;

        for dir in [&delete_dir, &match_dir] {
            let meta = dir.symlink_metadata().map_err(|_| {
                Error::invalid_argument(format!("directory does not exist: {}", dir.display()))
            })?;
            if !meta.is_dir() {
                return Err(Error::invalid_argument(format!(
                    "not a directory: {}",
                    dir.display()
                )));
            }
        }

        for entry in sorted_entries(&match_dir)? {
            let target = delete_dir.join(entry.file_name());
            if target.symlink_metadata().is_ok() {
                self.delete_inner(&target)?;
            }
        }

        Ok(())
    }

    /// Recursively applies the configured file and directory modes,
    /// skipping symbolic links. A no-op on non-Unix platforms.
    pub fn chmod(&self, path: &Path) -> Result<()> {
        let path = self.checked_path(path)?;
        self.chmod_inner(&path)
    }

    fn chmod_inner(&self, path: &Path) -> Result<()> {
        let meta = path
            .symlink_metadata()
            .map_err(|e| Error::io("path not found", path, e))?;

        if meta.file_type().is_symlink() {
            return Ok(());
        }

        if meta.is_dir() {
            for entry in sorted_entries(path)? {
                self.chmod_inner(&entry.path())?;
            }
            return set_mode(path, self.config().dir_mode);
        }

        set_mode(path, self.config().file_mode)
    }
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target = fs::read_link(from).map_err(|e| Error::io("link could not be read", from, e))?;
    std::os::unix::fs::symlink(&target, to)
        .map_err(|e| Error::io("link could not be created", to, e))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, _to: &Path) -> Result<()> {
    Err(Error::runtime(format!(
        "symbolic links are not supported on this platform: {}",
        from.display()
    )))
}
