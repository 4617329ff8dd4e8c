//! Document store trait.

use async_trait::async_trait;

use crate::Result;
use crate::types::{Document, Fields, Query};

use super::DocumentStream;

/// A document database holding named collections of documents.
///
/// Queries support one ascending ordering field, AND-combined equality and
/// inclusive range filters, offset and limit. Equality is type-strict: the
/// string `"2024"` does not match the integer `2024`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stream the documents matching a query.
    fn stream(&self, query: &Query) -> DocumentStream;

    /// Run a query and collect its documents.
    async fn run_query(&self, query: &Query) -> Result<Vec<Document>> {
        self.stream(query).try_collect().await
    }

    /// Count the documents matching a query's filters.
    ///
    /// Offset and limit on the query are ignored.
    async fn count(&self, query: &Query) -> Result<u64>;

    /// Fetch a single document. Returns `None` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create or overwrite a document with the given id.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Create a document with a store-generated id, returning the id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Merge fields into an existing document.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when the
    /// document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}
