//! Content hashes of decoded parameter maps, for request deduplication and
//! result caching.
//!
//! [`query_hash`] serializes the map in its current iteration order, so
//! `a=1&b=2` and `b=2&a=1` hash differently. Use [`canonical_query_hash`]
//! when logically equal queries must share a cache entry.

use md5::{Digest, Md5};

use crate::errors::ParserError;
use crate::value::{ParamMap, ParamValue};

/// MD5 of the JSON serialization of `params`, as 32 lowercase hex characters.
///
/// # Errors
///
/// Returns [`ParserError::HashFailed`] if the map cannot be serialized.
pub fn query_hash(params: &ParamMap) -> Result<String, ParserError> {
    let json = serde_json::to_vec(params)?;
    Ok(hex::encode(Md5::digest(&json)))
}

/// Like [`query_hash`], but with map keys sorted recursively first.
///
/// # Errors
///
/// Returns [`ParserError::HashFailed`] if the map cannot be serialized.
pub fn canonical_query_hash(params: &ParamMap) -> Result<String, ParserError> {
    query_hash(&sorted(params))
}

fn sorted(params: &ParamMap) -> ParamMap {
    let mut out: ParamMap = params
        .iter()
        .map(|(key, value)| (key.clone(), sorted_value(value)))
        .collect();
    out.sort_keys();
    out
}

fn sorted_value(value: &ParamValue) -> ParamValue {
    match value {
        ParamValue::Map(map) => ParamValue::Map(sorted(map)),
        ParamValue::List(items) => ParamValue::List(items.iter().map(sorted_value).collect()),
        scalar => scalar.clone(),
    }
}
