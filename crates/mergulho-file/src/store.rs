//! Filesystem storage for local document collections.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use mergulho_core::error::{Error, InvalidInputError, TransportError};
use mergulho_core::types::validate_identifier;
use mergulho_core::{Document, DocumentStore, DocumentStream, Fields, Query, Result};

use crate::eval;

fn map_io(err: std::io::Error) -> Error {
    Error::Transport(TransportError::Io {
        message: err.to_string(),
    })
}

fn map_json(path: &Path, err: serde_json::Error) -> Error {
    Error::InvalidInput(InvalidInputError::Document {
        message: format!("{}: {}", path.display(), err),
    })
}

/// Filesystem-backed document store.
///
/// Layout: `{root}/{collection}/{id}.json`, one JSON object per document.
/// Writers serialize on a per-collection lock file and replace documents
/// through a temporary file, so readers never observe a partial write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        validate_identifier(collection)?;
        Ok(self.root.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        validate_identifier(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{}.json", id)))
    }

    /// Take the collection's writer lock. Released when the file is dropped.
    fn lock_collection(&self, collection: &str) -> Result<File> {
        let dir = self.collection_dir(collection)?;
        fs::create_dir_all(&dir).map_err(map_io)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(dir.join(".lock"))
            .map_err(map_io)?;
        lock_file.lock_exclusive().map_err(map_io)?;
        Ok(lock_file)
    }

    fn read_document(path: &Path) -> Result<Option<Fields>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_io(e)),
        };
        let fields: Fields = serde_json::from_str(&content).map_err(|e| map_json(path, e))?;
        Ok(Some(fields))
    }

    fn write_document(path: &Path, fields: &Fields) -> Result<()> {
        let content = serde_json::to_string_pretty(fields).map_err(|e| map_json(path, e))?;

        let tmp_path = path.with_extension("json.tmp");
        let mut file = File::create(&tmp_path).map_err(map_io)?;
        file.write_all(content.as_bytes()).map_err(map_io)?;
        file.sync_data().map_err(map_io)?;
        fs::rename(&tmp_path, path).map_err(map_io)?;
        Ok(())
    }

    /// Read every document of a collection. A missing collection is empty.
    fn load_collection(root: &Path, collection: &str) -> Result<Vec<Document>> {
        validate_identifier(collection)?;
        let dir = root.join(collection);

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(map_io(e)),
        };

        let mut documents = Vec::new();
        for entry in entries {
            let path = entry.map_err(map_io)?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "Skipping document with non UTF-8 name");
                continue;
            };
            // Removed between listing and reading.
            if let Some(fields) = Self::read_document(&path)? {
                documents.push(Document::new(id, fields));
            }
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    fn stream(&self, query: &Query) -> DocumentStream {
        let root = self.root.clone();
        let query = query.clone();

        DocumentStream::new(async_stream::stream! {
            match Self::load_collection(&root, query.collection_name()) {
                Ok(documents) => {
                    let scanned = documents.len();
                    let selected = eval::execute(&query, documents);
                    debug!(
                        collection = %query.collection_name(),
                        scanned,
                        returned = selected.len(),
                        "Evaluated query"
                    );
                    for document in selected {
                        yield Ok(document);
                    }
                }
                Err(e) => yield Err(e),
            }
        })
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &Query) -> Result<u64> {
        let documents = Self::load_collection(&self.root, query.collection_name())?;
        let count = eval::execute(&query.unpaginated(), documents).len();
        Ok(count as u64)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let path = self.document_path(collection, id)?;
        Ok(Self::read_document(&path)?.map(|fields| Document::new(id, fields)))
    }

    #[instrument(skip(self, fields))]
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let path = self.document_path(collection, id)?;
        let lock = self.lock_collection(collection)?;

        Self::write_document(&path, &fields)?;
        lock.unlock().map_err(map_io)?;

        debug!(fields = fields.len(), "Wrote document");
        Ok(())
    }

    #[instrument(skip(self, fields))]
    async fn add(&self, collection: &str, fields: Fields) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.set(collection, &id, fields).await?;
        Ok(id)
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let path = self.document_path(collection, id)?;
        let lock = self.lock_collection(collection)?;

        let Some(mut current) = Self::read_document(&path)? else {
            return Err(Error::not_found(collection, id));
        };
        let changed = fields.len();
        current.extend(fields);
        Self::write_document(&path, &current)?;
        lock.unlock().map_err(map_io)?;

        debug!(changed, "Updated document");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let path = self.document_path(collection, id)?;
        let lock = self.lock_collection(collection)?;

        match fs::remove_file(&path) {
            Ok(()) => debug!("Deleted document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(map_io(e)),
        }
        lock.unlock().map_err(map_io)?;
        Ok(())
    }
}
