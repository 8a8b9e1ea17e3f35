//! URI path and query-structure normalization.

use crate::error::{Error, Result};
use crate::strutil;

/// Normalizes the path portion of an absolute URI.
///
/// Splits off the query at the first `?`, cleans the front per [`clean_path`],
/// and rejoins. When the URI has no path beyond scheme and host but carries a
/// query, a `/` is inserted so `scheme://host?q` becomes `scheme://host/?q`.
///
/// Fails with `InvalidArgument` when the string has no scheme separator.
pub fn clean_uri(uri: &str) -> Result<String> {
    if !uri.contains("://") {
        return Err(Error::invalid_argument(format!("invalid uri: {}", uri)));
    }

    let (front, query) = match uri.split_once('?') {
        Some((front, query)) => (front, Some(query)),
        None => (uri, None),
    };

    let mut out = clean_path(front);

    if let Some(query) = query {
        // Exactly two slashes means scheme://host with no path segment.
        if out.matches('/').count() == 2 {
            out.push('/');
        }
        out.push('?');
        out.push_str(query);
    }

    Ok(out)
}

/// Normalizes slashes in a URI path.
///
/// Backslashes become forward slashes, a leading `/` is ensured for
/// scheme-less input, and all trailing slashes are stripped. Empty input
/// stays empty.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let mut path = path.replace('\\', "/");

    if !path.contains("://") && !path.starts_with('/') {
        path.insert(0, '/');
    }

    while path.ends_with('/') {
        path.pop();
    }

    path
}

/// Strips a sub-path from the start of a path, segment-wise.
///
/// Both sides are padded with boundary slashes before trimming so that
/// `"a/test"` removes the leading `a/test` segment run from `"/a/test/test/"`,
/// never a partial segment. An empty `trim` only normalizes slashes.
pub fn ltrim_path(path: &str, trim: &str) -> String {
    let trim = trim.trim_matches('/');

    if trim.is_empty() {
        return format!("/{}", path.trim_matches('/'));
    }

    let padded = format!("/{}/", path.trim_matches('/'));
    let needle = format!("/{}/", trim);

    let rest = strutil::ltrim_value(&padded, &needle).trim_start_matches('/');

    format!("/{}", rest).trim_end_matches('/').to_string()
}

/// Strips a sub-path from the end of a path, segment-wise.
///
/// The counterpart of [`ltrim_path`].
pub fn rtrim_path(path: &str, trim: &str) -> String {
    let trim = trim.trim_matches('/');

    if trim.is_empty() {
        return format!("/{}", path.trim_matches('/'));
    }

    let padded = format!("/{}/", path.trim_matches('/'));
    let needle = format!("/{}/", trim);

    strutil::rtrim_value(&padded, &needle)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_uri_strips_trailing_slash() {
        assert_eq!(
            clean_uri("https://www.example.com/test/?query=value").unwrap(),
            "https://www.example.com/test?query=value"
        );
    }

    #[test]
    fn clean_uri_inserts_slash_before_query() {
        assert_eq!(
            clean_uri("https://www.example.com?query=value").unwrap(),
            "https://www.example.com/?query=value"
        );
    }

    #[test]
    fn clean_uri_requires_scheme() {
        assert!(clean_uri("www.example.com/test").is_err());
    }

    #[test]
    fn clean_path_normalizes() {
        assert_eq!(
            clean_path("https://www.example.com/test/test/"),
            "https://www.example.com/test/test"
        );
        assert_eq!(clean_path("test\\test/"), "/test/test");
        assert_eq!(clean_path(""), "");
    }

    #[test]
    fn clean_path_is_idempotent() {
        for p in ["", "/a/b", "a\\b/", "https://x.com/a/"] {
            let once = clean_path(p);
            assert_eq!(clean_path(&once), once);
        }
    }

    #[test]
    fn ltrim_path_removes_leading_segments() {
        assert_eq!(ltrim_path("/a/test/test/", "a/test"), "/test");
        assert_eq!(ltrim_path("/a/test/", "b"), "/a/test");
    }

    #[test]
    fn ltrim_path_empty_trim_normalizes() {
        assert_eq!(ltrim_path("//a/b//", ""), "/a/b");
    }

    #[test]
    fn rtrim_path_removes_trailing_segments() {
        assert_eq!(rtrim_path("/a/test/test/", "test"), "/a/test");
        assert_eq!(rtrim_path("/a/test/", "a"), "/a/test");
    }

    #[test]
    fn trim_path_whole_match_is_empty() {
        assert_eq!(ltrim_path("/a/", "a"), "");
        assert_eq!(rtrim_path("/a/", "a"), "");
    }
}
