//! Trim-by-value string primitives.
//!
//! These trim a whole substring from the start or end of a string, not a
//! character set like `str::trim_matches`. The URI path trimming functions
//! build on the single-shot variants.

/// Removes `value` from the start of `s` at most once.
pub fn ltrim_value<'a>(s: &'a str, value: &str) -> &'a str {
    if value.is_empty() {
        return s;
    }
    s.strip_prefix(value).unwrap_or(s)
}

/// Removes `value` from the start of `s` repeatedly until it no longer leads.
pub fn ltrim_value_all<'a>(s: &'a str, value: &str) -> &'a str {
    if value.is_empty() {
        return s;
    }
    let mut out = s;
    while let Some(rest) = out.strip_prefix(value) {
        out = rest;
    }
    out
}

/// Removes `value` from the end of `s` at most once.
pub fn rtrim_value<'a>(s: &'a str, value: &str) -> &'a str {
    if value.is_empty() {
        return s;
    }
    s.strip_suffix(value).unwrap_or(s)
}

/// Removes `value` from the end of `s` repeatedly until it no longer trails.
pub fn rtrim_value_all<'a>(s: &'a str, value: &str) -> &'a str {
    if value.is_empty() {
        return s;
    }
    let mut out = s;
    while let Some(rest) = out.strip_suffix(value) {
        out = rest;
    }
    out
}
