//! Query-structure parsing, building, and merging.
//!
//! A query structure is a recursive variant of scalar, ordered list, and
//! insertion-ordered map. Bracketed keys (`a[b][]=1`) nest on parse and the
//! serializer is the matched inverse: lists render with positional indices
//! (`key[0]`, `key[1]`), `Null` renders as a bare key, `Bool(false)` as `0`.

use indexmap::IndexMap;

use super::encode::{encode_uri, EncodeMethod};

/// Insertion-ordered map at one nesting level of a query structure.
pub type QueryMap = IndexMap<String, QueryValue>;

/// One value in a query structure.
///
/// Parsing only ever produces `Str`, `List`, and `Map`; the remaining
/// scalars exist for callers building queries by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<QueryValue>),
    Map(QueryMap),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// One input to [`merge_uri_queries`]: either a raw query string or an
/// already-parsed structure.
pub enum QuerySource {
    Raw(String),
    Parsed(QueryMap),
}

impl From<&str> for QuerySource {
    fn from(value: &str) -> Self {
        QuerySource::Raw(value.to_string())
    }
}

impl From<String> for QuerySource {
    fn from(value: String) -> Self {
        QuerySource::Raw(value)
    }
}

impl From<QueryMap> for QuerySource {
    fn from(value: QueryMap) -> Self {
        QuerySource::Parsed(value)
    }
}

/// One bracketed component of a query key.
enum KeyPart {
    /// `[]`: append to a list.
    Append,
    /// `[k]`: address a map key or list index.
    Key(String),
}

/// Parses a query string into a query structure.
///
/// Strips a single leading `?`, splits pairs leniently per
/// `application/x-www-form-urlencoded`, then interprets bracketed keys
/// recursively. The last value wins for duplicate scalar keys. Never fails;
/// malformed input yields a partial or empty structure.
pub fn parse_uri_query(query: &str) -> QueryMap {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut out = QueryMap::new();
    if query.is_empty() {
        return out;
    }

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let (root, parts) = split_bracket_key(&key);
        if root.is_empty() {
            continue;
        }
        let slot = out.entry(root).or_insert(QueryValue::Null);
        set_path(slot, &parts, QueryValue::Str(value.into_owned()));
    }

    out
}

/// Splits a decoded key into its root and bracketed parts.
///
/// Lenient: an unterminated bracket swallows the remainder as one literal
/// key, and text after a closing bracket that is not another bracket is
/// ignored.
fn split_bracket_key(key: &str) -> (String, Vec<KeyPart>) {
    let Some(open) = key.find('[') else {
        return (key.to_string(), Vec::new());
    };

    let root = key[..open].to_string();
    let mut parts = Vec::new();
    let mut rest = &key[open..];

    while let Some(after_open) = rest.strip_prefix('[') {
        match after_open.find(']') {
            Some(close) => {
                let inner = &after_open[..close];
                if inner.is_empty() {
                    parts.push(KeyPart::Append);
                } else {
                    parts.push(KeyPart::Key(inner.to_string()));
                }
                rest = &after_open[close + 1..];
            }
            None => {
                if !after_open.is_empty() {
                    parts.push(KeyPart::Key(after_open.to_string()));
                }
                break;
            }
        }
    }

    (root, parts)
}

/// Writes `leaf` into `slot` at the position named by `parts`, growing
/// containers as needed.
fn set_path(slot: &mut QueryValue, parts: &[KeyPart], leaf: QueryValue) {
    let Some((first, rest)) = parts.split_first() else {
        *slot = leaf;
        return;
    };

    match first {
        KeyPart::Append => match slot {
            QueryValue::List(items) => {
                let mut child = QueryValue::Null;
                set_path(&mut child, rest, leaf);
                items.push(child);
            }
            QueryValue::Map(map) => {
                // Appending to a map continues from the highest integer key.
                let key = next_auto_index(map).to_string();
                let child = map.entry(key).or_insert(QueryValue::Null);
                set_path(child, rest, leaf);
            }
            _ => {
                let mut child = QueryValue::Null;
                set_path(&mut child, rest, leaf);
                *slot = QueryValue::List(vec![child]);
            }
        },
        KeyPart::Key(key) => match key.parse::<usize>() {
            Ok(index) => set_index(slot, index, key, rest, leaf),
            Err(_) => set_key(slot, key, rest, leaf),
        },
    }
}

/// Addresses a string key, promoting `slot` to a map first when needed.
fn set_key(slot: &mut QueryValue, key: &str, rest: &[KeyPart], leaf: QueryValue) {
    promote_to_map(slot);
    if let QueryValue::Map(map) = slot {
        let child = map.entry(key.to_string()).or_insert(QueryValue::Null);
        set_path(child, rest, leaf);
    }
}

/// Addresses an integer key. Sequential indices keep a list a list; a gap or
/// an existing map falls back to string-keyed addressing.
fn set_index(slot: &mut QueryValue, index: usize, key: &str, rest: &[KeyPart], leaf: QueryValue) {
    let list_len = match slot {
        QueryValue::List(items) => Some(items.len()),
        _ => None,
    };

    match list_len {
        Some(len) if index < len => {
            if let QueryValue::List(items) = slot {
                set_path(&mut items[index], rest, leaf);
            }
        }
        Some(len) if index == len => {
            if let QueryValue::List(items) = slot {
                let mut child = QueryValue::Null;
                set_path(&mut child, rest, leaf);
                items.push(child);
            }
        }
        Some(_) => {
            promote_to_map(slot);
            set_key(slot, key, rest, leaf);
        }
        None => match slot {
            QueryValue::Map(_) => set_key(slot, key, rest, leaf),
            _ if index == 0 => {
                let mut child = QueryValue::Null;
                set_path(&mut child, rest, leaf);
                *slot = QueryValue::List(vec![child]);
            }
            _ => {
                *slot = QueryValue::Map(QueryMap::new());
                set_key(slot, key, rest, leaf);
            }
        },
    }
}

/// Rewrites a list (or scalar) in place as a map keyed `"0"`, `"1"`, ….
fn promote_to_map(slot: &mut QueryValue) {
    match slot {
        QueryValue::Map(_) => {}
        QueryValue::List(items) => {
            let mut map = QueryMap::new();
            for (index, item) in items.drain(..).enumerate() {
                map.insert(index.to_string(), item);
            }
            *slot = QueryValue::Map(map);
        }
        _ => *slot = QueryValue::Map(QueryMap::new()),
    }
}

fn next_auto_index(map: &QueryMap) -> usize {
    map.keys()
        .filter_map(|key| key.parse::<usize>().ok())
        .map(|index| index + 1)
        .max()
        .unwrap_or(0)
}

/// Serializes a query structure, the inverse of [`parse_uri_query`].
///
/// A nested value at key `k` under prefix `p` renders as `p[k]`; list
/// elements use their positional index the same way. `Null` emits the bare
/// encoded key with no `=`, `Bool(false)` emits `0`, `Bool(true)` emits `1`.
/// Keys and values are percent-encoded per `method` and joined with `&`.
pub fn build_uri_query(query: &QueryMap, method: EncodeMethod) -> String {
    let mut parts = Vec::new();
    for (key, value) in query {
        build_value(&mut parts, key, value, method);
    }
    parts.join("&")
}

fn build_value(parts: &mut Vec<String>, prefix: &str, value: &QueryValue, method: EncodeMethod) {
    match value {
        QueryValue::Map(map) => {
            for (key, child) in map {
                build_value(parts, &format!("{}[{}]", prefix, key), child, method);
            }
        }
        QueryValue::List(items) => {
            for (index, child) in items.iter().enumerate() {
                build_value(parts, &format!("{}[{}]", prefix, index), child, method);
            }
        }
        QueryValue::Null => parts.push(encode_uri(prefix, method)),
        QueryValue::Bool(value) => parts.push(format!(
            "{}={}",
            encode_uri(prefix, method),
            if *value { "1" } else { "0" }
        )),
        QueryValue::Int(value) => {
            parts.push(format!("{}={}", encode_uri(prefix, method), value));
        }
        QueryValue::Str(value) => parts.push(format!(
            "{}={}",
            encode_uri(prefix, method),
            encode_uri(value, method)
        )),
    }
}

/// Deep-merges query sources left to right.
///
/// Raw strings are parsed; parsed structures are round-tripped through
/// [`build_uri_query`] and [`parse_uri_query`] first so integer-like keys
/// collapse the same way on every side of the merge. Conflicting scalars are
/// overwritten by the later source, maps merge recursively, and lists merge
/// index-wise with the later source's extra elements appended.
pub fn merge_uri_queries<I>(sources: I) -> QueryMap
where
    I: IntoIterator<Item = QuerySource>,
{
    let mut merged = QueryMap::new();

    for source in sources {
        let parsed = match source {
            QuerySource::Raw(raw) => parse_uri_query(&raw),
            QuerySource::Parsed(query) => {
                parse_uri_query(&build_uri_query(&query, EncodeMethod::Rfc3986))
            }
        };

        for (key, value) in parsed {
            match merged.entry(key) {
                indexmap::map::Entry::Occupied(entry) => merge_value(entry.into_mut(), value),
                indexmap::map::Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
    }

    merged
}

fn merge_value(into: &mut QueryValue, from: QueryValue) {
    match from {
        QueryValue::Map(from_map) => match into {
            QueryValue::Map(into_map) => {
                for (key, value) in from_map {
                    match into_map.entry(key) {
                        indexmap::map::Entry::Occupied(entry) => {
                            merge_value(entry.into_mut(), value)
                        }
                        indexmap::map::Entry::Vacant(entry) => {
                            entry.insert(value);
                        }
                    }
                }
            }
            QueryValue::List(_) => {
                promote_to_map(into);
                merge_value(into, QueryValue::Map(from_map));
            }
            _ => *into = QueryValue::Map(from_map),
        },
        QueryValue::List(from_items) => match into {
            QueryValue::List(into_items) => {
                for (index, value) in from_items.into_iter().enumerate() {
                    if index < into_items.len() {
                        merge_value(&mut into_items[index], value);
                    } else {
                        into_items.push(value);
                    }
                }
            }
            QueryValue::Map(into_map) => {
                for (index, value) in from_items.into_iter().enumerate() {
                    match into_map.entry(index.to_string()) {
                        indexmap::map::Entry::Occupied(entry) => {
                            merge_value(entry.into_mut(), value)
                        }
                        indexmap::map::Entry::Vacant(entry) => {
                            entry.insert(value);
                        }
                    }
                }
            }
            _ => *into = QueryValue::List(from_items),
        },
        scalar => *into = scalar,
    }
}

/// Recursively sorts map keys at every nesting level.
///
/// Used to normalize structures for order-insensitive comparison.
pub fn sort_query_map(query: &mut QueryMap) {
    query.sort_keys();
    for value in query.values_mut() {
        sort_query_value(value);
    }
}

fn sort_query_value(value: &mut QueryValue) {
    match value {
        QueryValue::Map(map) => sort_query_map(map),
        QueryValue::List(items) => {
            for item in items {
                sort_query_value(item);
            }
        }
        _ => {}
    }
}
