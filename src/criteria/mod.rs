//! # Sort & Filter Criteria
//!
//! Structured views over the raw `sort` and `filter` query parameters. The
//! request parser only builds these from raw values; each validates its own
//! syntax at construction time.
//!
//! ## Sorting
//! ```rust,ignore
//! // Comma-separated fields, `-` for descending, `+` or nothing for ascending
//! GET /todos?sort=-created_at,title
//! ```
//!
//! ## Filtering
//! ```rust,ignore
//! // Equality
//! GET /todos?filter[completed]=true
//!
//! // Operators
//! GET /todos?filter[priority][gte]=5&filter[title][like]=urgent
//!
//! // Lists (IN)
//! GET /todos?filter[id][in]=1,2,3
//! GET /todos?filter[id][]=1&filter[id][]=2
//! ```

pub mod filter;
pub mod sort;

pub use filter::{Filter, FilterOperator, FilterParam};
pub use sort::{Sort, SortDirection, SortParam};

use crate::errors::ParserError;

const MAX_FIELD_NAME_LENGTH: usize = 100;

/// Basic field name validation shared by sort and filter
fn validate_field_name(param: &str, field: &str) -> Result<(), ParserError> {
    if field.is_empty() {
        return Err(ParserError::invalid_param(param, "Field name cannot be empty"));
    }
    if field.len() > MAX_FIELD_NAME_LENGTH {
        return Err(ParserError::invalid_param(
            param,
            format!("Field name cannot be longer than {MAX_FIELD_NAME_LENGTH} characters"),
        ));
    }
    if field.contains("..") {
        return Err(ParserError::invalid_param(
            param,
            format!("Invalid field name `{field}`"),
        ));
    }
    Ok(())
}
