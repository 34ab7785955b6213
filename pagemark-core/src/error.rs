//! Error types for Pagemark Core

use thiserror::Error;

/// Result type alias using PagemarkError
pub type Result<T> = std::result::Result<T, PagemarkError>;

/// Top-level error type for all Pagemark operations
#[derive(Debug, Error)]
pub enum PagemarkError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while fetching a document for a reading session
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document has no retrievable content; hosts render this as an error state
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("Malformed document record: {0}")]
    Malformed(String),
}

/// Errors raised by navigation requests that cannot be clamped
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No chapter at index {0}")]
    NoSuchChapter(usize),

    #[error("Reading session is closed")]
    SessionClosed,
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
