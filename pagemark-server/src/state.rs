//! Application state

use anyhow::Result;
use pagemark_core::storage::{LocalStorage, StorageProvider};
use pagemark_core::{StorageDocuments, StorageProgressStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage provider for documents and progress records
    pub storage: Arc<dyn StorageProvider>,

    /// Base path for storage
    pub storage_path: PathBuf,

    /// In-memory document index (would be a database in production)
    pub library: Arc<RwLock<Library>>,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ServerEvent>,
}

/// Library index storing document metadata
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Library {
    pub documents: HashMap<String, DocumentEntry>,
}

/// A document entry in the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    /// Length of the raw text in bytes
    pub length: usize,
    pub chapters: usize,
    pub added_at: chrono::DateTime<chrono::Utc>,
}

impl Library {
    /// Load library from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Save library to a JSON file atomically
    pub async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, &data).await?;
        tokio::fs::rename(&temp_path, path).await?;
        Ok(())
    }
}

/// Server-sent events
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A new document was uploaded
    DocumentAdded { id: String, title: String },

    /// A document was removed
    DocumentDeleted { id: String },

    /// Reading progress was written for a document
    ProgressSaved { id: String, percent: u8 },
}

impl AppState {
    /// Create application state from the environment
    pub async fn new() -> Result<Self> {
        let storage_path = std::env::var("PAGEMARK_STORAGE_PATH")
            .unwrap_or_else(|_| "./pagemark_data".to_string());
        let storage_path = PathBuf::from(storage_path);

        tokio::fs::create_dir_all(storage_path.join("documents")).await?;
        tokio::fs::create_dir_all(storage_path.join("progress")).await?;

        let library = match Library::load(&storage_path.join("library.json")).await {
            Ok(lib) => lib,
            Err(e) => {
                tracing::warn!("Failed to load library index, starting fresh: {}", e);
                Library::default()
            }
        };

        Ok(Self::with_storage(
            Arc::new(LocalStorage::new(&storage_path)),
            storage_path,
            library,
        ))
    }

    /// Assemble state around an existing storage backend
    pub fn with_storage(
        storage: Arc<dyn StorageProvider>,
        storage_path: PathBuf,
        library: Library,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            storage,
            storage_path,
            library: Arc::new(RwLock::new(library)),
            event_tx,
        }
    }

    /// Document records
    pub fn documents(&self) -> StorageDocuments {
        StorageDocuments::new(Arc::clone(&self.storage))
    }

    /// Reading progress records
    pub fn progress(&self) -> StorageProgressStore {
        StorageProgressStore::new(Arc::clone(&self.storage))
    }

    /// Get path to library index file
    pub fn library_path(&self) -> PathBuf {
        self.storage_path.join("library.json")
    }

    /// Save the library index
    pub async fn save_library(&self) -> Result<()> {
        let library = self.library.read().await;
        library.save(&self.library_path()).await
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast an event
    pub fn broadcast(&self, event: ServerEvent) {
        // Ignore errors (no subscribers)
        let _ = self.event_tx.send(event);
    }
}
