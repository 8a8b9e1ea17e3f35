//! urifs: URI query/path manipulation and safe filesystem tree operations.
//!
//! Two engines share this crate. The [`uri`] module parses and builds query
//! strings with bracketed nested keys, normalizes URI paths, resolves URIs
//! against a base host, and compares URIs ignoring query order — all
//! string-only. The [`fs`] module sanitizes paths and filenames against
//! configurable denylists and performs recursive copy/move/rename/delete
//! over real directory trees, driven by an [`IoConfig`].

pub mod config;
pub mod error;
pub mod fs;
pub mod strutil;
pub mod uri;

pub use config::IoConfig;
pub use error::{Error, Result};
pub use fs::{ExtFilter, TreeOps};
