//! Pure path and filename sanitization, no filesystem access.

use crate::error::{Error, Result};

use super::TreeOps;

impl TreeOps {
    /// Sanitizes a path against the configured tables.
    ///
    /// Splits on separators, drops empty segments, then per segment removes
    /// control characters, replaces bad path characters with `_`, and
    /// replaces empty or reserved segments wholesale with `_`. The result has
    /// a leading `/` and no trailing one; empty input cleans to the empty
    /// string. Idempotent.
    pub fn clean_path(&self, path: &str) -> String {
        let path = path.replace('\\', "/");
        let segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| self.clean_segment(segment))
            .collect();

        if segments.is_empty() {
            return String::new();
        }

        format!("/{}", segments.join("/"))
    }

    fn clean_segment(&self, segment: &str) -> String {
        let mut out = String::with_capacity(segment.len());
        for c in segment.chars() {
            if c.is_control() {
                continue;
            }
            if self.config().bad_path_chars.contains(c) {
                out.push('_');
            } else {
                out.push(c);
            }
        }

        if out.is_empty() {
            return "_".to_string();
        }

        let reserved = self
            .config()
            .reserved_path_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&out));
        if reserved {
            return "_".to_string();
        }

        out
    }

    /// Sanitizes an absolute directory path.
    ///
    /// Requires a leading `/` or a `C:` style drive prefix, otherwise
    /// `InvalidArgument`; the remainder is cleaned per [`clean_path`] and the
    /// prefix re-attached.
    ///
    /// [`clean_path`]: TreeOps::clean_path
    pub fn clean_dir(&self, dir: &str) -> Result<String> {
        let dir = dir.replace('\\', "/");

        if let Some(rest) = dir.strip_prefix('/') {
            return Ok(self.clean_path(rest));
        }

        let (head, rest) = match dir.split_once('/') {
            Some((head, rest)) => (head, rest),
            None => (dir.as_str(), ""),
        };

        let is_drive =
            head.len() == 2 && head.as_bytes()[0].is_ascii_alphabetic() && head.ends_with(':');
        if !is_drive {
            return Err(Error::invalid_argument(format!("invalid directory: {}", dir)));
        }

        Ok(format!("{}{}", head, self.clean_path(rest)))
    }

    /// Sanitizes a bare filename.
    ///
    /// Control and bad filename characters are removed outright. The stem
    /// (everything before the last `.`) is replaced with `_` when it matches
    /// a reserved filename case-insensitively; a trailing `.` is stripped and
    /// an empty result becomes `_`.
    pub fn clean_filename(&self, filename: &str) -> String {
        let filtered: String = filename
            .chars()
            .filter(|c| !c.is_control() && !self.config().bad_filename_chars.contains(*c))
            .collect();

        let (stem, extension) = match filtered.rfind('.') {
            Some(pos) => (&filtered[..pos], &filtered[pos + 1..]),
            None => (filtered.as_str(), ""),
        };

        let reserved = self
            .config()
            .reserved_filenames
            .iter()
            .any(|name| name.eq_ignore_ascii_case(stem));
        let stem = if reserved { "_" } else { stem };

        let joined = format!("{}.{}", stem, extension);
        let joined = joined.trim_end_matches('.');

        if joined.is_empty() {
            "_".to_string()
        } else {
            joined.to_string()
        }
    }

    /// True iff the separator-normalized path equals its own cleaning.
    pub fn is_valid_path(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let normalized = if segments.is_empty() {
            String::new()
        } else {
            format!("/{}", segments.join("/"))
        };

        self.clean_path(&normalized) == normalized
    }

    /// Cleans each input path, concatenates them, and resolves `..` segments
    /// lexically: a `..` pops the previous real segment unless that segment
    /// is itself `..`. No filesystem existence checks happen.
    pub fn join_paths<I, S>(&self, paths: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for path in paths {
            joined.push_str(&self.clean_path(path.as_ref()));
        }

        let mut resolved: Vec<&str> = Vec::new();
        for segment in joined.split('/') {
            if segment == ".." {
                if let Some(&previous) = resolved.last() {
                    if previous != ".." {
                        resolved.pop();
                        continue;
                    }
                }
            }
            resolved.push(segment);
        }

        resolved.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops() -> TreeOps {
        TreeOps::default()
    }

    #[test]
    fn clean_path_replaces_bad_characters() {
        assert_eq!(ops().clean_path("/a?b/c|d"), "/a_b/c_d");
        assert_eq!(ops().clean_path("a\\b"), "/a/b");
    }

    #[test]
    fn clean_path_drops_control_characters() {
        assert_eq!(ops().clean_path("/a\x07b"), "/ab");
        // A segment that is nothing but control characters collapses to _.
        assert_eq!(ops().clean_path("/\x01\x02"), "/_");
    }

    #[test]
    fn clean_path_replaces_reserved_segments() {
        assert_eq!(ops().clean_path("/a/$Extend/b"), "/a/_/b");
        assert_eq!(ops().clean_path("/a/$extend/b"), "/a/_/b");
    }

    #[test]
    fn clean_path_normalizes_separators() {
        assert_eq!(ops().clean_path("a//b///c/"), "/a/b/c");
        assert_eq!(ops().clean_path(""), "");
    }

    #[test]
    fn clean_path_is_idempotent() {
        for p in ["", "/a/b", "a?b\\c", "/a/$Extend", "//x//"] {
            let once = ops().clean_path(p);
            assert_eq!(ops().clean_path(&once), once);
        }
    }

    #[test]
    fn clean_dir_requires_absolute() {
        assert_eq!(ops().clean_dir("/a/b/").unwrap(), "/a/b");
        assert_eq!(ops().clean_dir("C:/a/b").unwrap(), "C:/a/b");
        assert!(ops().clean_dir("a/b").is_err());
        assert!(ops().clean_dir("").is_err());
    }

    #[test]
    fn clean_filename_reserved_and_empty() {
        assert_eq!(ops().clean_filename("$Reparse"), "_");
        assert_eq!(ops().clean_filename("?"), "_");
        assert_eq!(ops().clean_filename("con.txt"), "_.txt");
        assert_eq!(ops().clean_filename(""), "_");
    }

    #[test]
    fn clean_filename_keeps_ordinary_names() {
        assert_eq!(ops().clean_filename("report.pdf"), "report.pdf");
        assert_eq!(ops().clean_filename("archive.tar.gz"), "archive.tar.gz");
        assert_eq!(ops().clean_filename(".gitignore"), ".gitignore");
    }

    #[test]
    fn clean_filename_removes_bad_characters() {
        assert_eq!(ops().clean_filename("a?b*c.txt"), "abc.txt");
        assert_eq!(ops().clean_filename("name."), "name");
    }

    #[test]
    fn is_valid_path_matches_cleaning() {
        assert!(ops().is_valid_path("/a/b"));
        assert!(ops().is_valid_path("a/b/"));
        assert!(!ops().is_valid_path("/a?b"));
        assert!(!ops().is_valid_path("/$Extend"));
    }

    #[test]
    fn join_paths_resolves_dot_dot() {
        assert_eq!(ops().join_paths(["/a/b", "../c"]), "/a/c");
        assert_eq!(ops().join_paths(["/a", "b/c"]), "/a/b/c");
        assert_eq!(ops().join_paths(["/a/b", "../../c"]), "/c");
    }

    #[test]
    fn join_paths_keeps_unresolvable_dot_dot() {
        assert_eq!(ops().join_paths(["/../../a"]), "../a");
    }

    #[test]
    fn custom_tables_are_honored() {
        let mut config = crate::IoConfig::default();
        config.bad_path_chars = "!".to_string();
        config.reserved_path_names = vec!["secret".to_string()];
        config.reserved_filenames = vec!["hidden".to_string()];
        let ops = TreeOps::new(config);

        assert_eq!(ops.clean_path("/a!b/?c"), "/a_b/?c");
        assert_eq!(ops.clean_path("/SECRET/x"), "/_/x");
        assert_eq!(ops.clean_filename("hidden.txt"), "_.txt");
        assert_eq!(ops.clean_filename("$Reparse"), "$Reparse");
    }
}
