//! # Request Parser
//!
//! [`RequestCriteria`] decodes a query string once and exposes the well-known
//! search parameters as typed fields:
//!
//! | identifier | type | default when absent |
//! |---|---|---|
//! | `sort` | [`Sort`] | empty sort |
//! | `filter` | [`Filter`] | empty filter |
//! | `limit`, `offset`, `page` | `u64` | none |
//! | `phrase` | `String` | none |
//!
//! Everything else stays in the decoded parameter map and can be read with
//! on-demand coercion:
//!
//! ```rust
//! use querycrate::{ParamValue, RequestCriteria};
//!
//! let criteria = RequestCriteria::parse("sort=-name&filter[status]=active&limit=10&page=2&tags=a,b").unwrap();
//! assert_eq!(criteria.limit(), Some(10));
//! assert_eq!(criteria.offset_or(0), 0);
//! assert_eq!(criteria.sort().to_string(), "-name");
//! assert_eq!(
//!     criteria.get_query_param("tags", Some("array"), None).unwrap(),
//!     Some(ParamValue::List(vec!["a".into(), "b".into()]))
//! );
//! ```

use std::str::FromStr;

use crate::config::ParserConfig;
use crate::criteria::{Filter, Sort};
use crate::digest;
use crate::errors::ParserError;
use crate::form;
use crate::pagination::PaginationField;
use crate::value::{ParamMap, ParamValue, ValueKind};

pub const SORT_IDENTIFIER: &str = "sort";
pub const FILTER_IDENTIFIER: &str = "filter";
pub const LIMIT_IDENTIFIER: &str = "limit";
pub const OFFSET_IDENTIFIER: &str = "offset";
pub const PAGE_IDENTIFIER: &str = "page";
pub const PHRASE_IDENTIFIER: &str = "phrase";

/// Search criteria decoded from a single query string.
///
/// Built once by [`RequestCriteria::parse`]; afterwards every setter
/// validates and replaces only its own field.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestCriteria {
    query: String,
    params: ParamMap,
    sort: Sort,
    filter: Filter,
    limit: Option<u64>,
    offset: Option<u64>,
    page: Option<u64>,
    phrase: Option<String>,
}

impl RequestCriteria {
    /// Parse a query string (without the leading `?`) with default decode limits.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidParam`] for negative pagination values or
    /// malformed sort/filter expressions, and [`ParserError::CoercionFailed`]
    /// when a pagination value does not fit an integer.
    pub fn parse(query: &str) -> Result<Self, ParserError> {
        Self::parse_with(query, &ParserConfig::default())
    }

    /// Parse a query string with explicit decode limits.
    ///
    /// # Errors
    ///
    /// Same as [`RequestCriteria::parse`].
    pub fn parse_with(query: &str, config: &ParserConfig) -> Result<Self, ParserError> {
        let params = form::decode(query, config);

        let sort_raw = coerced(&params, SORT_IDENTIFIER, ValueKind::String)?;
        let sort = Sort::new(sort_raw.as_ref().and_then(ParamValue::as_str))?;

        let filter_raw = coerced(&params, FILTER_IDENTIFIER, ValueKind::Array)?
            .unwrap_or_else(|| ParamValue::List(Vec::new()));
        let filter = Filter::new(&filter_raw)?;

        let mut criteria = Self {
            query: query.to_string(),
            params,
            sort,
            filter,
            limit: None,
            offset: None,
            page: None,
            phrase: None,
        };

        criteria.set_limit(coerced_int(&criteria.params, LIMIT_IDENTIFIER)?)?;
        criteria.set_offset(coerced_int(&criteria.params, OFFSET_IDENTIFIER)?)?;
        criteria.set_page(coerced_int(&criteria.params, PAGE_IDENTIFIER)?)?;
        let phrase = coerced(&criteria.params, PHRASE_IDENTIFIER, ValueKind::String)?
            .and_then(|value| value.as_str().map(str::to_owned));
        criteria.set_phrase(phrase);

        tracing::debug!(
            params = criteria.params.len(),
            sort = criteria.sort.len(),
            filter = criteria.filter.len(),
            limit = ?criteria.limit,
            offset = ?criteria.offset,
            page = ?criteria.page,
            "Parsed request criteria"
        );

        Ok(criteria)
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    /// The raw query string, verbatim
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// All decoded parameters, in decode order
    #[must_use]
    pub fn query_params(&self) -> &ParamMap {
        &self.params
    }

    #[must_use]
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    #[must_use]
    pub fn phrase(&self) -> Option<&str> {
        self.phrase.as_deref()
    }

    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        self.offset
    }

    #[must_use]
    pub const fn page(&self) -> Option<u64> {
        self.page
    }

    /// Stored limit, or `default` when absent
    #[must_use]
    pub fn limit_or(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default)
    }

    /// Stored offset, or `default` when absent
    #[must_use]
    pub fn offset_or(&self, default: u64) -> u64 {
        self.offset.unwrap_or(default)
    }

    /// Stored page, or `default` when absent
    #[must_use]
    pub fn page_or(&self, default: u64) -> u64 {
        self.page.unwrap_or(default)
    }

    // ============================================================================
    // Generic parameters
    // ============================================================================

    /// Raw decoded value of `name`, uncoerced
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Read `name`, optionally coerced to the type named by `kind`.
    ///
    /// Returns `default` when `name` is absent. Without `kind` the stored
    /// value is returned unchanged. Accepted tokens (any case): `boolean`,
    /// `bool`, `integer`, `int`, `float`, `double`, `string`, `array`.
    ///
    /// # Errors
    ///
    /// [`ParserError::UnsupportedType`] for an unknown token,
    /// [`ParserError::CoercionFailed`] when the value cannot be represented.
    pub fn get_query_param(
        &self,
        name: &str,
        kind: Option<&str>,
        default: Option<ParamValue>,
    ) -> Result<Option<ParamValue>, ParserError> {
        let Some(value) = self.params.get(name) else {
            return Ok(default);
        };
        match kind {
            None => Ok(Some(value.clone())),
            Some(token) => value.coerce(ValueKind::from_str(token)?).map(Some),
        }
    }

    /// Read `name` coerced to `kind`; `None` when absent.
    ///
    /// # Errors
    ///
    /// [`ParserError::CoercionFailed`] when the value cannot be represented.
    pub fn coerce_query_param(
        &self,
        name: &str,
        kind: ValueKind,
    ) -> Result<Option<ParamValue>, ParserError> {
        coerced(&self.params, name, kind)
    }

    /// Remove `name` from the decoded parameters.
    ///
    /// Fields already extracted at parse time (sort, filter, pagination,
    /// phrase) are not affected.
    pub fn remove_query_param(&mut self, name: &str) -> &mut Self {
        self.params.shift_remove(name);
        self
    }

    // ============================================================================
    // Setters
    // ============================================================================

    /// # Errors
    ///
    /// [`ParserError::InvalidParam`] when `limit` is negative; the stored
    /// value is left unchanged.
    pub fn set_limit(&mut self, limit: Option<i64>) -> Result<&mut Self, ParserError> {
        self.limit = PaginationField::Limit.check(limit)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// [`ParserError::InvalidParam`] when `offset` is negative; the stored
    /// value is left unchanged.
    pub fn set_offset(&mut self, offset: Option<i64>) -> Result<&mut Self, ParserError> {
        self.offset = PaginationField::Offset.check(offset)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// [`ParserError::InvalidParam`] when `page` is negative; the stored
    /// value is left unchanged.
    pub fn set_page(&mut self, page: Option<i64>) -> Result<&mut Self, ParserError> {
        self.page = PaginationField::Page.check(page)?;
        Ok(self)
    }

    pub fn set_sort(&mut self, sort: Sort) -> &mut Self {
        self.sort = sort;
        self
    }

    pub fn set_filter(&mut self, filter: Filter) -> &mut Self {
        self.filter = filter;
        self
    }

    pub fn set_phrase(&mut self, phrase: Option<String>) -> &mut Self {
        self.phrase = phrase;
        self
    }

    // ============================================================================
    // Hashing & encoding
    // ============================================================================

    /// MD5 hex digest of the decoded parameters, in their current order.
    ///
    /// Two criteria parsed from the same string hash identically; the same
    /// pairs in a different order may not. See [`Self::canonical_query_hash`].
    ///
    /// # Errors
    ///
    /// [`ParserError::HashFailed`] if the parameters cannot be serialized.
    pub fn query_hash(&self) -> Result<String, ParserError> {
        digest::query_hash(&self.params)
    }

    /// MD5 hex digest of the decoded parameters with map keys sorted.
    ///
    /// # Errors
    ///
    /// [`ParserError::HashFailed`] if the parameters cannot be serialized.
    pub fn canonical_query_hash(&self) -> Result<String, ParserError> {
        digest::canonical_query_hash(&self.params)
    }

    /// Re-encode the current parameters as a query string
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form::encode(&self.params)
    }
}

impl FromStr for RequestCriteria {
    type Err = ParserError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        Self::parse(query)
    }
}

fn coerced(
    params: &ParamMap,
    name: &str,
    kind: ValueKind,
) -> Result<Option<ParamValue>, ParserError> {
    params.get(name).map(|value| value.coerce(kind)).transpose()
}

fn coerced_int(params: &ParamMap, name: &str) -> Result<Option<i64>, ParserError> {
    Ok(coerced(params, name, ValueKind::Integer)?.and_then(|value| value.as_i64()))
}
