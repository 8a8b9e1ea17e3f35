//! Percent-encoding and URL-safe base64.
//!
//! Each URI component gets its own allow-list matching its grammar. The
//! component encoders leave already-valid `%XX` sequences untouched so
//! partially encoded input is not double-encoded.

use std::borrow::Cow;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use percent_encoding::{percent_decode_str, percent_encode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Error, Result};

/// Query-string encoding convention.
///
/// RFC 3986 renders a space as `%20`; RFC 1738 renders it as `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeMethod {
    #[default]
    Rfc3986,
    Rfc1738,
}

/// Everything except the RFC 3986 unreserved characters.
const FULL: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path component: unreserved, sub-delims, and `:` `@` `/`.
const PATH: AsciiSet = FULL
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@')
    .remove(b'/');

/// User-info component: unreserved and sub-delims only.
const USER_INFO: AsciiSet = FULL
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Query and fragment components: the path set plus `?`.
const QUERY: AsciiSet = PATH.remove(b'?');

/// Percent-encodes everything outside the unreserved set.
pub fn encode_uri(value: &str, method: EncodeMethod) -> String {
    let encoded = utf8_percent_encode(value, &FULL).to_string();
    match method {
        EncodeMethod::Rfc1738 => encoded.replace("%20", "+"),
        EncodeMethod::Rfc3986 => encoded,
    }
}

/// Reverses [`encode_uri`]. Invalid percent sequences pass through verbatim
/// and invalid UTF-8 is replaced, so decoding is total.
pub fn decode_uri(value: &str, method: EncodeMethod) -> String {
    let value: Cow<'_, str> = match method {
        EncodeMethod::Rfc1738 => Cow::Owned(value.replace('+', " ")),
        EncodeMethod::Rfc3986 => Cow::Borrowed(value),
    };
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}

/// Encodes a URI path, keeping `/`, `:`, `@`, and sub-delims.
pub fn encode_uri_path(path: &str, method: EncodeMethod) -> String {
    encode_component(path, &PATH, method)
}

/// Encodes a URI user-info component, keeping only unreserved and sub-delims.
pub fn encode_uri_user_info(value: &str, method: EncodeMethod) -> String {
    encode_component(value, &USER_INFO, method)
}

/// Encodes a URI query component, additionally keeping `?` and `/`.
pub fn encode_uri_query(value: &str, method: EncodeMethod) -> String {
    encode_component(value, &QUERY, method)
}

/// Encodes a URI fragment; same grammar as the query component.
pub fn encode_uri_fragment(value: &str, method: EncodeMethod) -> String {
    encode_component(value, &QUERY, method)
}

/// Byte-wise encoder that copies valid `%XX` sequences through unchanged.
fn encode_component(value: &str, set: &'static AsciiSet, method: EncodeMethod) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push_str(&value[i..i + 3]);
            i += 3;
            continue;
        }
        for piece in percent_encode(&bytes[i..i + 1], set) {
            out.push_str(piece);
        }
        i += 1;
    }

    match method {
        EncodeMethod::Rfc1738 => out.replace("%20", "+"),
        EncodeMethod::Rfc3986 => out,
    }
}

/// Encodes bytes with the URL-safe base64 alphabet, unpadded.
pub fn base64_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes URL-safe base64, tolerating trailing padding.
pub fn base64_decode(data: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(data.trim_end_matches('='))
        .map_err(|e| Error::invalid_argument(format!("invalid base64: {}", e)))
}
