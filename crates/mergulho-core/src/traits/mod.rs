//! Core traits for document store behavior.

mod store;
mod stream;

pub use store::DocumentStore;
pub use stream::DocumentStream;
