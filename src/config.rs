//! Sanitization tables and default modes consumed by the tree engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Filename stems reserved by popular operating systems and filesystem
/// metadata conventions (DOS device names, NTFS metadata files).
const RESERVED_FILENAMES: &[&str] = &[
    "CON", "PRN", "AUX", "CLOCK$", "NUL", "COM0", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6",
    "COM7", "COM8", "COM9", "LPT0", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7",
    "LPT8", "LPT9", "$Mft", "$MftMirr", "$LogFile", "$Volume", "$AttrDef", "$Bitmap", "$Boot",
    "$BadClus", "$Secure", "$Upcase", "$Extend", "$Quota", "$ObjId", "$Reparse",
];

/// Characters forbidden in path segments and filenames across common
/// operating systems.
const BAD_CHARACTERS: &str = "/\\?*:|\"<>";

/// Configuration for [`TreeOps`](crate::fs::TreeOps): default modes and the
/// sanitization tables used by path and filename cleaning.
///
/// The tables are held by the engine instance rather than process globals, so
/// tests and embedders can supply alternates without mutating shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Mode applied to files created by `write_file` and `chmod`.
    pub file_mode: u32,
    /// Mode applied to each directory level created by `make_dir`.
    pub dir_mode: u32,
    /// Characters replaced with `_` inside path segments.
    pub bad_path_chars: String,
    /// Characters removed outright from filenames.
    pub bad_filename_chars: String,
    /// Path segments replaced wholesale with `_` (case-insensitive).
    pub reserved_path_names: Vec<String>,
    /// Filename stems replaced with `_` (case-insensitive).
    pub reserved_filenames: Vec<String>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            file_mode: 0o644,
            dir_mode: 0o755,
            bad_path_chars: BAD_CHARACTERS.to_string(),
            bad_filename_chars: BAD_CHARACTERS.to_string(),
            reserved_path_names: vec!["$Extend".to_string()],
            reserved_filenames: RESERVED_FILENAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IoConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).map_err(|e| Error::io("config could not be read", path, e))?;
        toml::from_str(&data)
            .map_err(|e| Error::invalid_argument(format!("invalid config ({}): {}", path.display(), e)))
    }

    /// Load configuration from disk, creating a default file if none exists.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let cfg = IoConfig::default();
            let toml = toml::to_string_pretty(&cfg)
                .map_err(|e| Error::runtime(format!("config could not be serialized: {}", e)))?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::io("config directory could not be created", parent, e))?;
            }
            fs::write(path, toml).map_err(|e| Error::io("config could not be written", path, e))?;
            tracing::info!("created default config at {}", path.display());
            return Ok(cfg);
        }

        Self::load(path)
    }
}
