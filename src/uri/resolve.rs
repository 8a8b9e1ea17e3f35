//! Host-relative URI resolution and order-insensitive equality.

use super::query::{parse_uri_query, sort_query_map};

fn strip_scheme(uri: &str) -> &str {
    match uri.find("://") {
        Some(pos) => &uri[pos + 3..],
        None => uri,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Converts a URI to a host-relative one.
///
/// With a base in `to`, the URI becomes relative when its host matches the
/// base host at a segment boundary (the next character is `/`, `?`, `#`, or
/// the end; `example.com` never matches `example.comm`). A leading `www.` is
/// ignored on both sides for the comparison only. A non-matching schemeless
/// URI is promoted to `http://` when a dot occurs before the first path
/// delimiter, else it is prefixed with `/`; anything else is returned
/// unchanged.
///
/// Without a base, the scheme and host are dropped and everything from the
/// first `/`, `?`, or `#` onward remains, defaulting to `/`.
pub fn relative_uri(uri: &str, to: Option<&str>) -> String {
    let Some(to) = to else {
        let bare = strip_scheme(uri);
        return match bare.find(['/', '?', '#']) {
            Some(pos) => bare[pos..].to_string(),
            None => "/".to_string(),
        };
    };

    let base = strip_www(strip_scheme(to)).trim_end_matches('/');
    let bare = strip_scheme(uri);
    let has_scheme = bare.len() != uri.len();
    let compare = strip_www(bare);

    if !base.is_empty() {
        if let Some(rest) = compare.strip_prefix(base) {
            let on_boundary = rest
                .chars()
                .next()
                .map_or(true, |c| matches!(c, '/' | '?' | '#'));
            if on_boundary {
                return if rest.is_empty() {
                    "/".to_string()
                } else {
                    rest.to_string()
                };
            }
        }
    }

    if !has_scheme && !uri.starts_with(['/', '?', '#']) {
        let head = uri.split(['/', '?', '#']).next().unwrap_or("");
        // A dot before the first delimiter means an external host.
        if head.contains('.') {
            return format!("http://{}", uri);
        }
        return format!("/{}", uri);
    }

    uri.to_string()
}

/// Makes a URI absolute against a base.
///
/// A URI that already carries a scheme is returned unchanged.
pub fn absolute_uri(uri: &str, to: &str) -> String {
    if uri.contains("://") {
        return uri.to_string();
    }

    format!(
        "{}/{}",
        to.trim_end_matches('/'),
        uri.trim_start_matches('/')
    )
}

/// Compares two URIs for semantic equality.
///
/// Hosts must match exactly (a missing host only equals a missing host),
/// paths are compared with the trailing slash stripped, and queries are
/// compared after recursive key-sorting, which makes parameter order
/// irrelevant while key casing and values stay significant.
pub fn uri_equals(uri1: &str, uri2: &str) -> bool {
    let (host1, path1, query1) = split_components(uri1);
    let (host2, path2, query2) = split_components(uri2);

    if host1 != host2 {
        return false;
    }

    if path1.trim_end_matches('/') != path2.trim_end_matches('/') {
        return false;
    }

    let mut query1 = parse_uri_query(query1.as_deref().unwrap_or(""));
    let mut query2 = parse_uri_query(query2.as_deref().unwrap_or(""));
    sort_query_map(&mut query1);
    sort_query_map(&mut query2);

    query1 == query2
}

/// Splits a URI into host, path, and query.
///
/// Absolute URIs go through the `url` parser; anything it rejects is treated
/// as a host-less relative reference and split informally.
fn split_components(uri: &str) -> (Option<String>, String, Option<String>) {
    match url::Url::parse(uri) {
        Ok(parsed) => (
            parsed.host_str().map(str::to_string),
            parsed.path().to_string(),
            parsed.query().map(str::to_string),
        ),
        Err(_) => {
            let rest = uri.split_once('#').map_or(uri, |(rest, _)| rest);
            let (path, query) = match rest.split_once('?') {
                Some((path, query)) => (path, Some(query)),
                None => (rest, None),
            };
            (None, path.to_string(), query.map(str::to_string))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_with_matching_base() {
        assert_eq!(
            relative_uri("https://pyncer.com/core", Some("https://pyncer.com")),
            "/core"
        );
        assert_eq!(
            relative_uri("https://pyncer.com/core", Some("https://pyncer.com/")),
            "/core"
        );
        assert_eq!(
            relative_uri("https://www.pyncer.com/core", Some("https://pyncer.com")),
            "/core"
        );
    }

    #[test]
    fn relative_with_other_host_stays_absolute() {
        assert_eq!(
            relative_uri("https://pyncer.com/core", Some("https://pyncer.org")),
            "https://pyncer.com/core"
        );
    }

    #[test]
    fn relative_host_match_needs_a_boundary() {
        assert_eq!(
            relative_uri("https://example.comm/x", Some("https://example.com")),
            "https://example.comm/x"
        );
    }

    #[test]
    fn relative_bare_host_becomes_root() {
        assert_eq!(
            relative_uri("https://pyncer.com", Some("https://pyncer.com")),
            "/"
        );
        assert_eq!(
            relative_uri("https://pyncer.com?a=1", Some("https://pyncer.com")),
            "?a=1"
        );
    }

    #[test]
    fn relative_schemeless_with_dot_gets_http() {
        assert_eq!(
            relative_uri("example.org/page", Some("https://pyncer.com")),
            "http://example.org/page"
        );
    }

    #[test]
    fn relative_schemeless_without_dot_gets_slash() {
        assert_eq!(
            relative_uri("core/module", Some("https://pyncer.com")),
            "/core/module"
        );
    }

    #[test]
    fn relative_without_base() {
        assert_eq!(relative_uri("https://pyncer.com/core", None), "/core");
        assert_eq!(relative_uri("https://pyncer.com", None), "/");
        assert_eq!(relative_uri("https://pyncer.com?a=1", None), "?a=1");
    }

    #[test]
    fn absolute_concatenates() {
        assert_eq!(
            absolute_uri("core", "https://pyncer.com"),
            "https://pyncer.com/core"
        );
        assert_eq!(
            absolute_uri("/core", "https://pyncer.com/"),
            "https://pyncer.com/core"
        );
    }

    #[test]
    fn absolute_keeps_schemed_uri() {
        assert_eq!(
            absolute_uri("https://other.com/x", "https://pyncer.com"),
            "https://other.com/x"
        );
    }

    #[test]
    fn equals_ignores_query_order() {
        assert!(uri_equals(
            "https://x.com/core?foo=bar&bar=foo",
            "https://x.com/core?bar=foo&foo=bar"
        ));
    }

    #[test]
    fn equals_is_symmetric() {
        let a = "https://x.com/core?a[x]=1&a[y]=2";
        let b = "https://x.com/core?a[y]=2&a[x]=1";
        assert!(uri_equals(a, b));
        assert!(uri_equals(b, a));
    }

    #[test]
    fn equals_ignores_trailing_slash() {
        assert!(uri_equals("https://x.com", "https://x.com/"));
        assert!(uri_equals("https://x.com/core/", "https://x.com/core"));
    }

    #[test]
    fn equals_respects_host_and_values() {
        assert!(!uri_equals("https://x.com/core", "https://y.com/core"));
        assert!(!uri_equals("https://x.com/?a=1", "https://x.com/?a=2"));
        assert!(!uri_equals("https://x.com/?A=1", "https://x.com/?a=1"));
    }

    #[test]
    fn equals_relative_references() {
        assert!(uri_equals("/core?a=1&b=2", "/core/?b=2&a=1"));
        assert!(!uri_equals("/core", "https://x.com/core"));
    }
}
