//! # Form Decoding
//!
//! Decodes `application/x-www-form-urlencoded` query strings into an ordered
//! [`ParamMap`], honouring bracket notation for nested structures:
//!
//! ```rust,ignore
//! // Flat pairs
//! sort=-name&limit=10            -> {"sort": "-name", "limit": "10"}
//!
//! // Nested maps
//! filter[status]=active          -> {"filter": {"status": "active"}}
//! filter[age][gte]=18            -> {"filter": {"age": {"gte": "18"}}}
//!
//! // Implicit indices
//! tag[]=a&tag[]=b                -> {"tag": ["a", "b"]}
//! ```
//!
//! Later pairs overwrite earlier ones at the same path. A container whose keys
//! are exactly `0..n-1`, in order, decodes as a list; any other container
//! decodes as a map.

use indexmap::IndexMap;
use url::form_urlencoded;

use crate::config::ParserConfig;
use crate::value::{ParamMap, ParamValue, ValueKind};

/// One step below the base name: `Some(key)` for `[key]`, `None` for `[]`.
type Segment = Option<String>;

enum Node {
    Leaf(String),
    Branch(Branch),
}

#[derive(Default)]
struct Branch {
    entries: IndexMap<String, Node>,
    next_index: i64,
}

impl Branch {
    fn insert(&mut self, path: &[Segment], value: String) {
        let Some((first, rest)) = path.split_first() else {
            return;
        };
        let key = first
            .clone()
            .unwrap_or_else(|| self.next_index.to_string());
        if let Some(index) = integer_key(&key)
            && index >= self.next_index
            && let Some(next) = index.checked_add(1)
        {
            self.next_index = next;
        }

        if rest.is_empty() {
            self.entries.insert(key, Node::Leaf(value));
            return;
        }

        let child = self
            .entries
            .entry(key)
            .or_insert_with(|| Node::Branch(Branch::default()));
        if matches!(child, Node::Leaf(_)) {
            *child = Node::Branch(Branch::default());
        }
        if let Node::Branch(branch) = child {
            branch.insert(rest, value);
        }
    }

    fn into_map(self) -> ParamMap {
        self.entries
            .into_iter()
            .map(|(key, node)| (key, node.into_value()))
            .collect()
    }

    fn is_sequential(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(position, key)| integer_key(key).and_then(|k| usize::try_from(k).ok()) == Some(position))
    }
}

impl Node {
    fn into_value(self) -> ParamValue {
        match self {
            Self::Leaf(value) => ParamValue::String(value),
            Self::Branch(branch) if branch.is_sequential() => ParamValue::List(
                branch
                    .entries
                    .into_values()
                    .map(Node::into_value)
                    .collect(),
            ),
            Self::Branch(branch) => ParamValue::Map(branch.into_map()),
        }
    }
}

/// Canonical decimal integer keys (`0`, `17`, `-3`; not `07` or `-0`).
fn integer_key(key: &str) -> Option<i64> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let canonical = match digits.as_bytes() {
        [b'0'] => digits.len() == key.len(),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
        [] => false,
    };
    if canonical { key.parse().ok() } else { None }
}

/// Split `base[a][][b]` into the base name and its bracket segments.
///
/// Returns `None` for keys with an empty base name. A first `[` without a
/// closing `]` makes the whole key literal; text after the last `]` that does
/// not open another bracket is ignored.
fn split_key(key: &str) -> Option<(String, Vec<Segment>)> {
    let Some(open) = key.find('[') else {
        return (!key.is_empty()).then(|| (key.to_string(), Vec::new()));
    };
    let base = &key[..open];
    if base.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    let mut pos = open;
    while key[pos..].starts_with('[') {
        let Some(len) = key[pos + 1..].find(']') else {
            if segments.is_empty() {
                return Some((key.to_string(), Vec::new()));
            }
            break;
        };
        let segment = &key[pos + 1..pos + 1 + len];
        segments.push((!segment.is_empty()).then(|| segment.to_string()));
        pos += len + 2;
    }

    Some((base.to_string(), segments))
}

/// Decode a raw query string (without the leading `?`) into an ordered map.
#[must_use]
pub fn decode(query: &str, config: &ParserConfig) -> ParamMap {
    let mut root = Branch::default();
    let mut dropped = 0usize;

    for (index, (key, value)) in form_urlencoded::parse(query.as_bytes()).enumerate() {
        if index >= config.max_vars {
            dropped += 1;
            continue;
        }
        let Some((base, segments)) = split_key(&key) else {
            tracing::debug!(key = %key, "Skipping query parameter without a name");
            continue;
        };
        if segments.len() > config.max_depth {
            tracing::warn!(
                key = %key,
                depth = segments.len(),
                max_depth = config.max_depth,
                "Dropping query parameter nested too deep"
            );
            continue;
        }

        let mut path = Vec::with_capacity(segments.len() + 1);
        path.push(Some(base));
        path.extend(segments);
        root.insert(&path, value.into_owned());
    }

    if dropped > 0 {
        tracing::warn!(
            dropped,
            max_vars = config.max_vars,
            "Query string exceeds the parameter limit, dropping the rest"
        );
    }

    root.into_map()
}

/// Encode a parameter map back into a query string using bracket notation.
///
/// Decoding the result yields the same map for any map produced by [`decode`].
#[must_use]
pub fn encode(params: &ParamMap) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        append_pairs(&mut serializer, key.clone(), value);
    }
    serializer.finish()
}

fn append_pairs(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    prefix: String,
    value: &ParamValue,
) {
    match value {
        ParamValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                append_pairs(serializer, format!("{prefix}[{index}]"), item);
            }
        }
        ParamValue::Map(map) => {
            for (key, item) in map {
                append_pairs(serializer, format!("{prefix}[{key}]"), item);
            }
        }
        scalar => {
            let text = scalar
                .coerce(ValueKind::String)
                .ok()
                .and_then(|v| v.as_str().map(str::to_owned))
                .unwrap_or_default();
            serializer.append_pair(&prefix, &text);
        }
    }
}
