//! URI query and path handling.
//!
//! Parses and builds query strings (including bracketed nested keys),
//! normalizes URI path/query structure, resolves relative/absolute URIs
//! against a base host, and compares URIs ignoring query-parameter order.
//! Everything here is string-only; no network I/O happens.

mod clean;
mod encode;
mod query;
mod resolve;

pub use clean::{clean_path, clean_uri, ltrim_path, rtrim_path};
pub use encode::{
    base64_decode, base64_encode, decode_uri, encode_uri, encode_uri_fragment, encode_uri_path,
    encode_uri_query, encode_uri_user_info, EncodeMethod,
};
pub use query::{
    build_uri_query, merge_uri_queries, parse_uri_query, sort_query_map, QueryMap, QuerySource,
    QueryValue,
};
pub use resolve::{absolute_uri, relative_uri, uri_equals};
