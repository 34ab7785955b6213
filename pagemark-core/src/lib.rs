//! Pagemark Core Library
//!
//! The reading-position engine behind the Pagemark reader. A raw document is
//! split into estimated pages, chapter headings are detected heuristically and
//! bound to pages, and a controller keeps the reader's position and progress
//! percentage in sync with a durable progress store.

pub mod binder;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod paginate;
pub mod position;
pub mod reader;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

mod lines;

pub use binder::{bind, build_layout, chapter_range, chapter_text};
pub use classifier::{classify, classify_with_tier, Classification, Tier};
pub use config::EngineConfig;
pub use controller::{ProgressController, SaveRequest, SaveTrigger};
pub use error::{LoadError, NavigationError, PagemarkError, Result, StorageError};
pub use paginate::paginate;
pub use position::locate;
pub use reader::{Reader, ReaderView};
pub use session::{open_session, spawn_session, SessionHandle, SessionSnapshot};
pub use store::{DocumentLoader, ProgressStore, StorageDocuments, StorageProgressStore};
pub use types::{
    Chapter, Document, Layout, Page, PageMetrics, Progress, ProgressDisplay, ReadingPosition,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_two_headings_one_page() {
        let layout = build_layout("# A\nfoo\n# B\nbar", PageMetrics::new(16, 1_000.0));
        assert_eq!(layout.total_pages(), 1);
        let chapters: Vec<(&str, usize)> = layout
            .chapters
            .iter()
            .map(|c| (c.title.as_str(), c.page_index))
            .collect();
        assert_eq!(chapters, vec![("A", 0), ("B", 0)]);
    }
}
