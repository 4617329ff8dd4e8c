//! Stream of query results.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::StreamExt;

use crate::Result;
use crate::types::Document;

/// Documents produced by a query, in query order.
///
/// Backends produce documents lazily; the first error ends the query for
/// the caller that collects it.
pub struct DocumentStream {
    inner: Pin<Box<dyn Stream<Item = Result<Document>> + Send>>,
}

impl DocumentStream {
    /// Wrap a backend stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Document>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Collect every document, stopping at the first error.
    pub async fn try_collect(mut self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        while let Some(document) = self.next().await {
            documents.push(document?);
        }
        Ok(documents)
    }
}

impl Stream for DocumentStream {
    type Item = Result<Document>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for DocumentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStream").finish_non_exhaustive()
    }
}
