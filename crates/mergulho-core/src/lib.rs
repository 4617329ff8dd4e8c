//! mergulho-core - Document store abstraction and the paginated queries
//! served by the Mergulho Virtual backend.
//!
//! Two resources share the same query shape:
//!
//! - [`sightings`]: wildlife sightings ("avistamentos"), ordered by `registro`
//!   and filtered by the day/month/year the sighting was recorded.
//! - [`telemetry`]: tag telemetry ("telemetria"), ordered by `date` and
//!   filtered by device `oid` and an epoch range.
//!
//! Both run against any [`DocumentStore`] implementation.

pub mod error;
pub mod page;
pub mod sightings;
pub mod telemetry;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::Error;
pub use page::{PageRequest, PageResult};
pub use traits::{DocumentStore, DocumentStream};
pub use types::{Document, Fields, FilterOp, Query, RangeBound, StoreUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
