//! Store double that records the last query it was given.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, ProtocolError};
use crate::traits::{DocumentStore, DocumentStream};
use crate::types::{Document, Fields, Query};
use crate::Result;

pub(crate) struct RecordingStore {
    returned: usize,
    count: u64,
    fail: bool,
    last: Mutex<Option<Query>>,
}

impl RecordingStore {
    /// Answer every query with `n` empty documents.
    pub fn returning(n: usize) -> Self {
        Self {
            returned: n,
            count: 0,
            fail: false,
            last: Mutex::new(None),
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(0)
        }
    }

    pub fn last_query(&self) -> Query {
        self.last
            .lock()
            .unwrap()
            .clone()
            .expect("no query was issued")
    }

    fn record(&self, query: &Query) {
        *self.last.lock().unwrap() = Some(query.clone());
    }
}

fn unavailable() -> Error {
    Error::Protocol(ProtocolError::new(
        503,
        Some("UNAVAILABLE".to_string()),
        None,
    ))
}

#[async_trait]
impl DocumentStore for RecordingStore {
    fn stream(&self, query: &Query) -> DocumentStream {
        self.record(query);
        if self.fail {
            return DocumentStream::new(futures_util::stream::iter(vec![Err(unavailable())]));
        }
        let docs: Vec<Result<Document>> = (0..self.returned)
            .map(|i| Ok(Document::new(i.to_string(), Fields::new())))
            .collect();
        DocumentStream::new(futures_util::stream::iter(docs))
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        self.record(&query.unpaginated());
        if self.fail {
            return Err(unavailable());
        }
        Ok(self.count)
    }

    async fn get(&self, _collection: &str, _id: &str) -> Result<Option<Document>> {
        Ok(None)
    }

    async fn set(&self, _collection: &str, _id: &str, _fields: Fields) -> Result<()> {
        Ok(())
    }

    async fn add(&self, _collection: &str, _fields: Fields) -> Result<String> {
        Ok("generated".to_string())
    }

    async fn update(&self, collection: &str, id: &str, _fields: Fields) -> Result<()> {
        Err(Error::not_found(collection, id))
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<()> {
        Ok(())
    }
}
