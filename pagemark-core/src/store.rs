//! Persistence collaborators: the progress store and the document loader

use crate::error::{LoadError, StorageError};
use crate::storage::{StorageProvider, StorageResult};
use crate::types::{Document, Progress};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Durable per-document reading progress
///
/// Writes must be idempotent: the same percentage may arrive more than once, and
/// overlapping writes resolve as last-write-wins.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Saved progress for a document; `Progress::ZERO` if none was ever saved
    async fn read_progress(&self, document_id: Uuid) -> StorageResult<Progress>;

    async fn write_progress(&self, document_id: Uuid, progress: Progress) -> StorageResult<()>;
}

/// Read saved progress, treating any failure as "no prior progress"
pub async fn read_progress_or_default(store: &dyn ProgressStore, document_id: Uuid) -> Progress {
    match store.read_progress(document_id).await {
        Ok(progress) => progress,
        Err(e) => {
            tracing::warn!(%document_id, "failed to read saved progress, starting at 0: {}", e);
            Progress::ZERO
        }
    }
}

/// One-shot source of document content for a reading session
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, document_id: Uuid) -> Result<Document, LoadError>;
}

/// Stored progress record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub percent: Progress,
    pub updated_at: DateTime<Utc>,
}

/// Progress store keeping one JSON record per document under `progress/`
#[derive(Clone)]
pub struct StorageProgressStore {
    storage: Arc<dyn StorageProvider>,
}

impl StorageProgressStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    fn path(document_id: Uuid) -> String {
        format!("progress/{document_id}.json")
    }

    /// Full stored record, if any
    pub async fn read_record(&self, document_id: Uuid) -> StorageResult<Option<ProgressRecord>> {
        let data = match self.storage.read(&Self::path(document_id)).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| StorageError::BackendError(format!("corrupt progress record: {e}")))
    }

    /// Remove the stored record; missing records are not an error
    pub async fn clear(&self, document_id: Uuid) -> StorageResult<()> {
        match self.storage.delete(&Self::path(document_id)).await {
            Ok(()) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ProgressStore for StorageProgressStore {
    async fn read_progress(&self, document_id: Uuid) -> StorageResult<Progress> {
        Ok(self
            .read_record(document_id)
            .await?
            .map_or(Progress::ZERO, |record| record.percent))
    }

    async fn write_progress(&self, document_id: Uuid, progress: Progress) -> StorageResult<()> {
        let record = ProgressRecord {
            percent: progress,
            updated_at: Utc::now(),
        };
        let data = serde_json::to_vec(&record)
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        self.storage.write(&Self::path(document_id), data).await
    }
}

/// Documents kept as JSON records under `documents/`
#[derive(Clone)]
pub struct StorageDocuments {
    storage: Arc<dyn StorageProvider>,
}

impl StorageDocuments {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    fn path(document_id: Uuid) -> String {
        format!("documents/{document_id}.json")
    }

    pub async fn save(&self, document: &Document) -> StorageResult<()> {
        let data = serde_json::to_vec(document)
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        self.storage.write(&Self::path(document.id), data).await
    }

    pub async fn delete(&self, document_id: Uuid) -> StorageResult<()> {
        self.storage.delete(&Self::path(document_id)).await
    }

    pub async fn exists(&self, document_id: Uuid) -> StorageResult<bool> {
        self.storage.exists(&Self::path(document_id)).await
    }
}

#[async_trait]
impl DocumentLoader for StorageDocuments {
    async fn load(&self, document_id: Uuid) -> Result<Document, LoadError> {
        let data = self
            .storage
            .read(&Self::path(document_id))
            .await
            .map_err(|e| LoadError::ContentUnavailable(format!("{document_id}: {e}")))?;
        serde_json::from_slice(&data).map_err(|e| LoadError::Malformed(e.to_string()))
    }
}
