//! # Error Handling
//!
//! Every fallible operation in this crate returns [`ParserError`]. Failures are
//! raised synchronously at the point of detection and never leave a
//! [`RequestCriteria`](crate::RequestCriteria) holding a half-applied value.
//!
//! ## Usage
//!
//! ```rust
//! use querycrate::{ParserError, RequestCriteria};
//!
//! let mut criteria = RequestCriteria::parse("limit=10").unwrap();
//! match criteria.set_limit(Some(-1)) {
//!     Err(ParserError::InvalidParam { param, .. }) => assert_eq!(param, "limit"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use thiserror::Error;

use crate::value::ValueKind;

/// Errors produced while decoding, coercing, validating or hashing query parameters.
#[derive(Debug, Error)]
pub enum ParserError {
    /// A parameter holds a value the parser refuses to store (negative
    /// pagination, malformed sort field, unknown filter operator).
    #[error("Invalid `{param}` parameter: {reason}")]
    InvalidParam {
        /// Identifier of the offending parameter (e.g. "limit", "filter[status]")
        param: String,
        /// User-facing reason
        reason: String,
    },

    /// `get_query_param` was given a type token outside the supported set.
    #[error("Unsupported type [{0}]")]
    UnsupportedType(String),

    /// The stored value cannot be represented in the requested type.
    #[error("Cannot set type [{kind}]: {reason}")]
    CoercionFailed {
        /// Requested target type
        kind: ValueKind,
        /// What made the value unrepresentable
        reason: String,
    },

    /// The parameter map could not be serialized for hashing.
    #[error("Cannot query hash. {0}")]
    HashFailed(#[source] serde_json::Error),
}

impl ParserError {
    /// Create an invalid-parameter error
    pub fn invalid_param(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Create a coercion-failure error for the given target type
    pub fn coercion_failed(kind: ValueKind, reason: impl Into<String>) -> Self {
        Self::CoercionFailed {
            kind,
            reason: reason.into(),
        }
    }

    /// Name of the parameter this error refers to, when there is one
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::InvalidParam { param, .. } => Some(param),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ParserError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!(error = ?err, "Query parameter serialization failed");
        Self::HashFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_param_message() {
        let err = ParserError::invalid_param("limit", "Limit value cannot be lower than 0");
        assert_eq!(
            err.to_string(),
            "Invalid `limit` parameter: Limit value cannot be lower than 0"
        );
        assert_eq!(err.param(), Some("limit"));
    }

    #[test]
    fn test_unsupported_type_names_token() {
        let err = ParserError::UnsupportedType("uuid".to_string());
        assert_eq!(err.to_string(), "Unsupported type [uuid]");
        assert_eq!(err.param(), None);
    }

    #[test]
    fn test_coercion_failed_names_kind() {
        let err = ParserError::coercion_failed(ValueKind::Integer, "out of range");
        assert_eq!(err.to_string(), "Cannot set type [integer]: out of range");
    }

    #[test]
    fn test_hash_failed_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ParserError = json_err.into();
        assert!(err.to_string().starts_with("Cannot query hash."));
        assert!(err.source().is_some());
    }
}
