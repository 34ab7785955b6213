//! Page type produced by the paginator

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A single estimated page of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Position in the page sequence (0-based)
    pub index: usize,

    /// Page content with trailing whitespace trimmed
    pub text: String,

    /// Byte offset in the document where this page begins
    pub start_offset: usize,

    /// Byte offset where the next page begins (document length for the last page)
    pub end_offset: usize,
}

impl Page {
    /// The half-open byte range this page covers in the document
    pub fn range(&self) -> Range<usize> {
        self.start_offset..self.end_offset
    }
}
