//! Error types for urifs.

use std::path::Path;

use thiserror::Error;

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Library error type.
///
/// Two kinds cover the whole surface: the caller handed us something
/// malformed or unsafe, or an operation failed against the live filesystem.
/// No retries and no partial-failure recovery happen below this layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied malformed or unsafe input (schemeless URI, relative
    /// directory argument, argument of the wrong kind).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation could not complete (permission, collision, I/O error).
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl Error {
    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Error::Runtime(msg.into())
    }

    /// Runtime error carrying the failing path and the OS error text.
    pub fn io(context: &str, path: &Path, source: std::io::Error) -> Self {
        Error::Runtime(format!("{} ({}): {}", context, path.display(), source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_kind_and_message() {
        let e = Error::invalid_argument("no scheme");
        assert_eq!(e.to_string(), "invalid argument: no scheme");
        let e = Error::runtime("rename failed");
        assert_eq!(e.to_string(), "runtime error: rename failed");
    }

    #[test]
    fn io_folds_path_and_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e = Error::io("source not found", Path::new("/tmp/x"), source);
        let text = e.to_string();
        assert!(text.contains("source not found"));
        assert!(text.contains("/tmp/x"));
        assert!(text.contains("gone"));
    }
}
