//! Chapter type representing a detected heading in the raw text

use serde::{Deserialize, Serialize};

/// A chapter heading found by the classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Heading text
    pub title: String,

    /// Heading depth (1-6); 1 when the heading style carries no depth
    pub level: u8,

    /// Byte offset of the heading line in the document
    pub source_offset: usize,

    /// Page the heading lands on; filled in by the binder
    pub page_index: usize,
}

impl Chapter {
    /// Create a top-level chapter at the given offset
    pub fn new(title: impl Into<String>, source_offset: usize) -> Self {
        Self {
            title: title.into(),
            level: 1,
            source_offset,
            page_index: 0,
        }
    }

    /// Set the heading depth, clamped to 1-6
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level.clamp(1, 6);
        self
    }

    /// Set the page index
    pub fn with_page_index(mut self, page_index: usize) -> Self {
        self.page_index = page_index;
        self
    }
}
