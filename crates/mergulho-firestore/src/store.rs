//! Firestore-backed document store.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use mergulho_core::error::{Error, InvalidInputError};
use mergulho_core::types::validate_identifier;
use mergulho_core::{Document, DocumentStore, DocumentStream, Fields, Query, Result};

use crate::client::{FirestoreClient, FirestoreConfig, is_missing};
use crate::value;
use crate::wire::{
    self, RunAggregationQueryRequest, RunAggregationQueryResponseItem, RunQueryRequest,
    RunQueryResponseItem, StructuredQuery, WireDocument, WriteDocument,
};

fn into_document(wire: WireDocument) -> Result<Document> {
    let fields = value::decode_fields(&wire.fields)?;
    Ok(Document::new(wire.id(), fields))
}

async fn run_query(client: &FirestoreClient, query: &Query) -> Result<Vec<Document>> {
    let url = client.method_url("runQuery")?;
    let body = RunQueryRequest {
        structured_query: StructuredQuery::from(query),
    };
    let items: Vec<RunQueryResponseItem> = client.post(url, &body).await?;

    // Items without a document only carry read times or skipped counts.
    items
        .into_iter()
        .filter_map(|item| item.document)
        .map(into_document)
        .collect()
}

/// A [`DocumentStore`] over the Firestore REST API.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: FirestoreClient,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        Ok(Self {
            client: FirestoreClient::new(config)?,
        })
    }

    fn document_url(&self, collection: &str, id: &str) -> Result<reqwest::Url> {
        validate_identifier(collection)?;
        validate_identifier(id)?;
        self.client.document_url(&[collection, id])
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn stream(&self, query: &Query) -> DocumentStream {
        let client = self.client.clone();
        let query = query.clone();

        DocumentStream::new(async_stream::stream! {
            match run_query(&client, &query).await {
                Ok(documents) => {
                    debug!(
                        collection = %query.collection_name(),
                        returned = documents.len(),
                        "Ran query"
                    );
                    for document in documents {
                        yield Ok(document);
                    }
                }
                Err(e) => yield Err(e),
            }
        })
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &Query) -> Result<u64> {
        let url = self.client.method_url("runAggregationQuery")?;
        let body = RunAggregationQueryRequest::count(query);
        let items: Vec<RunAggregationQueryResponseItem> = self.client.post(url, &body).await?;

        let Some(result) = items.into_iter().find_map(|item| item.result) else {
            return Ok(0);
        };
        let count = match result.aggregate_fields.get(wire::COUNT_ALIAS) {
            Some(count) => value::decode(count)?,
            None => return Ok(0),
        };
        count.as_u64().ok_or_else(|| {
            Error::InvalidInput(InvalidInputError::Document {
                message: format!("bad count {}", count),
            })
        })
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = self.document_url(collection, id)?;
        let document: Option<WireDocument> = self.client.get(url).await?;
        document.map(into_document).transpose()
    }

    #[instrument(skip(self, fields))]
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let url = self.document_url(collection, id)?;
        let body = WriteDocument {
            fields: value::encode_fields(&fields),
        };
        let _: Value = self.client.patch(url, &[], &body).await?;
        debug!(fields = fields.len(), "Wrote document");
        Ok(())
    }

    #[instrument(skip(self, fields))]
    async fn add(&self, collection: &str, fields: Fields) -> Result<String> {
        validate_identifier(collection)?;
        let url = self.client.document_url(&[collection])?;
        let body = WriteDocument {
            fields: value::encode_fields(&fields),
        };
        let created: WireDocument = self.client.post(url, &body).await?;
        debug!(id = %created.id(), "Created document");
        Ok(created.id().to_string())
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let url = self.document_url(collection, id)?;

        // A PATCH without a mask replaces the whole document.
        if fields.is_empty() {
            return match self.get(collection, id).await? {
                Some(_) => Ok(()),
                None => Err(Error::not_found(collection, id)),
            };
        }

        let mut params: Vec<(&str, String)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", wire::field_path(name)))
            .collect();
        params.push(("currentDocument.exists", "true".to_string()));

        let body = WriteDocument {
            fields: value::encode_fields(&fields),
        };
        match self.client.patch::<_, Map<String, Value>>(url, &params, &body).await {
            Ok(_) => {
                debug!(changed = fields.len(), "Updated document");
                Ok(())
            }
            Err(e) if is_missing(&e) => Err(Error::not_found(collection, id)),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let url = self.document_url(collection, id)?;
        self.client.delete(url).await
    }
}
