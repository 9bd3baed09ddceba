//! # querycrate
//!
//! Turns the search part of a URL into typed request criteria for list and
//! search endpoints: pagination, a free-text phrase, sort and filter
//! expressions, and any other parameter with on-demand type coercion. Also
//! produces a content hash of the decoded parameters for deduplication or
//! result caching.
//!
//! ```rust
//! use querycrate::RequestCriteria;
//!
//! let criteria = RequestCriteria::parse("phrase=shoes&sort=-price&filter[size][in]=41,42&limit=20").unwrap();
//! assert_eq!(criteria.phrase(), Some("shoes"));
//! assert_eq!(criteria.limit_or(10), 20);
//! assert_eq!(criteria.page_or(1), 1);
//! assert_eq!(criteria.filter().len(), 1);
//! assert_eq!(criteria.query_hash().unwrap().len(), 32);
//! ```
//!
//! ## Logging
//!
//! Decoding and parsing emit `tracing` events. To see them, install a
//! subscriber in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```

pub mod config;
pub mod criteria;
pub mod digest;
pub mod errors;
pub mod form;
pub mod pagination;
pub mod parser;
pub mod value;

pub use config::ParserConfig;
pub use criteria::{Filter, FilterOperator, FilterParam, Sort, SortDirection, SortParam};
pub use errors::ParserError;
pub use pagination::PaginationField;
pub use parser::RequestCriteria;
pub use value::{ParamMap, ParamValue, ValueKind};
