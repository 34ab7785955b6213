//! Core types shared by the reading-position engine

mod chapter;
mod document;
mod layout;
mod page;
mod progress;

pub use chapter::Chapter;
pub use document::Document;
pub use layout::{Layout, PageMetrics};
pub use page::Page;
pub use progress::{Progress, ProgressDisplay, ReadingPosition};
