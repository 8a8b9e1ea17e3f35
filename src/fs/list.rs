//! Directory listings and whole-file read/write helpers.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::{set_mode, sorted_entries, TreeOps};

/// Extension filter for [`TreeOps::files`] and [`TreeOps::filenames`].
///
/// Callers pass no filter, a single extension, or a list; the filter is
/// resolved to a uniform list at the top of each call. Matching is
/// case-insensitive, and entries without an extension always pass.
#[derive(Debug, Clone, Default)]
pub enum ExtFilter {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl ExtFilter {
    fn to_list(&self) -> Vec<String> {
        match self {
            ExtFilter::None => Vec::new(),
            ExtFilter::One(ext) => vec![ext.to_ascii_lowercase()],
            ExtFilter::Many(exts) => exts.iter().map(|e| e.to_ascii_lowercase()).collect(),
        }
    }
}

impl From<&str> for ExtFilter {
    fn from(ext: &str) -> Self {
        ExtFilter::One(ext.to_string())
    }
}

impl From<Vec<String>> for ExtFilter {
    fn from(exts: Vec<String>) -> Self {
        ExtFilter::Many(exts)
    }
}

fn extension_matches(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|allowed| *allowed == ext)
        }
        None => true,
    }
}

impl TreeOps {
    /// Files directly inside `dir`, sorted ascending by name, optionally
    /// limited to the given extensions.
    pub fn files(&self, dir: &Path, filter: &ExtFilter) -> Result<Vec<PathBuf>> {
        let dir = self.checked_path(dir)?;
        if !dir.is_dir() {
            return Err(Error::invalid_argument(format!(
                "invalid directory: {}",
                dir.display()
            )));
        }

        let extensions = filter.to_list();
        let mut files = Vec::new();

        for entry in sorted_entries(&dir)? {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if !extension_matches(&path, &extensions) {
                continue;
            }
            files.push(path);
        }

        Ok(files)
    }

    /// File names directly inside `dir`, sorted ascending, with the
    /// extension optionally stripped.
    pub fn filenames(
        &self,
        dir: &Path,
        filter: &ExtFilter,
        strip_extension: bool,
    ) -> Result<Vec<String>> {
        let files = self.files(dir, filter)?;

        Ok(files
            .iter()
            .filter_map(|path| {
                if strip_extension {
                    path.file_stem()
                } else {
                    path.file_name()
                }
            })
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    /// Directories directly inside `dir`, sorted ascending by name.
    pub fn dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = self.checked_path(dir)?;
        if !dir.is_dir() {
            return Err(Error::invalid_argument(format!(
                "invalid directory: {}",
                dir.display()
            )));
        }

        let mut dirs = Vec::new();
        for entry in sorted_entries(&dir)? {
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }

        Ok(dirs)
    }

    /// Directory names directly inside `dir`, sorted ascending.
    pub fn dirnames(&self, dir: &Path) -> Result<Vec<String>> {
        let dirs = self.dirs(dir)?;

        Ok(dirs
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    /// Whether `dir` is empty, ignoring the given child names.
    pub fn is_empty_dir(&self, dir: &Path, ignore: &[&str]) -> Result<bool> {
        let dir = self.checked_path(dir)?;
        if !dir.is_dir() {
            return Err(Error::invalid_argument(format!(
                "invalid directory: {}",
                dir.display()
            )));
        }

        let entries =
            fs::read_dir(&dir).map_err(|e| Error::io("directory could not be opened", &dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("directory could not be read", &dir, e))?;
            let name = entry.file_name();
            if ignore.iter().any(|ignored| name == **ignored) {
                continue;
            }
            return Ok(false);
        }

        Ok(true)
    }

    /// Writes `data` to `file`, creating the parent directory when missing
    /// and applying the configured file mode. Returns the bytes written.
    pub fn write_file(&self, file: &Path, data: &[u8], append: bool) -> Result<u64> {
        let file = self.checked_path(file)?;

        if let Some(parent) = file.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                self.make_dir_inner(parent, self.config().dir_mode)?;
            }
        }

        let mut options = fs::OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let mut handle = options
            .open(&file)
            .map_err(|e| Error::io("file is not writeable", &file, e))?;
        handle
            .write_all(data)
            .map_err(|e| Error::io("file is not writeable", &file, e))?;

        set_mode(&file, self.config().file_mode)?;

        Ok(data.len() as u64)
    }

    /// Reads `file` whole. Fails with `Runtime` when missing or unreadable
    /// and `InvalidArgument` when the path is not a regular file.
    pub fn read_file(&self, file: &Path) -> Result<Vec<u8>> {
        let file = self.checked_path(file)?;

        let meta = file
            .metadata()
            .map_err(|e| Error::io("file not found", &file, e))?;
        if !meta.is_file() {
            return Err(Error::invalid_argument(format!(
                "not a file: {}",
                file.display()
            )));
        }

        fs::read(&file).map_err(|e| Error::io("file is not readable", &file, e))
    }
}
