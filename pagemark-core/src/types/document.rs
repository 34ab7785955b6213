//! The Document type handed to the engine by the loader

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raw text document and its display metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for this document
    pub id: Uuid,

    /// Display title
    pub title: String,

    /// Author, if known
    #[serde(default)]
    pub author: Option<String>,

    /// Full raw text content
    pub text: String,
}

impl Document {
    /// Create a new document with a fresh id
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: None,
            text: text.into(),
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}
