//! mergulho-firestore - Firestore REST document store.
//!
//! Talks to the Firestore v1 REST API (or the emulator) with plain HTTPS
//! requests: `runQuery` and `runAggregationQuery` for listings and counts,
//! and the document endpoints for reads and writes.
//!
//! ```no_run
//! use mergulho_core::StoreUrl;
//! use mergulho_firestore::{FirestoreConfig, FirestoreStore};
//!
//! # fn main() -> mergulho_core::Result<()> {
//! let endpoint = StoreUrl::new("https://firestore.googleapis.com")?;
//! let config = FirestoreConfig::new(endpoint, "mergulho-virtual").with_token("ya29...");
//! let store = FirestoreStore::new(config)?;
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod client;
mod store;
mod value;
mod wire;

pub use client::{FirestoreClient, FirestoreConfig};
pub use store::FirestoreStore;
