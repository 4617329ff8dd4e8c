//! mergulho-file - Filesystem-backed document store.
//!
//! Each collection is a directory and each document a pretty-printed JSON
//! file named after its id. Queries are evaluated in-process with the same
//! ordering and filter semantics as the remote store.

mod eval;
mod store;

pub use store::FileStore;
