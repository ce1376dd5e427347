//! File-backed key-value store.
//!
//! All keys live in one JSON object (`{"key": "serialized value", ...}`).
//! Every write rewrites the whole document into a sibling temp file and
//! renames it over the original, so a crash mid-write leaves the previous
//! document intact.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::error::{StorageError, StorageResult};

type Document = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the document.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StorageResult<Document> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Document::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the document ahead of a write. An unparseable document is
    /// logged and replaced by an empty one so the store can recover; the
    /// flag reports whether that happened.
    async fn read_document_for_write(&self) -> StorageResult<(Document, bool)> {
        match self.read_document().await {
            Ok(document) => Ok((document, false)),
            Err(StorageError::Serialization(e)) => {
                tracing::error!(path = %self.path.display(), error = %e, "store document is corrupt, starting over");
                Ok((Document::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_document(&self, document: &Document) -> StorageResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec(document)?).await?;
        fs::rename(&tmp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), keys = document.len(), "store document written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_document().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let (mut document, _) = self.read_document_for_write().await?;
        document.insert(key.to_owned(), value);
        self.write_document(&document).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let (mut document, reset) = self.read_document_for_write().await?;
        if document.remove(key).is_some() || reset {
            self.write_document(&document).await?;
        }
        Ok(())
    }
}
