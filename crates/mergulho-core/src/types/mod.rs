//! Core store types.
//!
//! Identifiers and URLs are validated at construction time.

mod document;
mod query;
mod store_url;

pub use document::{Document, Fields, validate_identifier};
pub use query::{FieldFilter, FilterOp, Query, RangeBound};
pub use store_url::StoreUrl;
