//! Reader facade: one document, its layout, and the reading position

use crate::binder::{build_layout, chapter_at_page, chapter_text};
use crate::config::EngineConfig;
use crate::controller::{ProgressController, SaveRequest};
use crate::error::NavigationError;
use crate::position::locate;
use crate::types::{Chapter, Document, Layout, PageMetrics, Progress, ProgressDisplay};
use serde::Serialize;
use tokio::time::Instant;

/// What the rendering layer needs to draw the reader
#[derive(Debug, Clone, Serialize)]
pub struct ReaderView<'a> {
    /// Raw text to render: the whole selected chapter, or just the current page
    pub content: &'a str,
    pub page_index: usize,
    pub total_pages: usize,
    pub chapters: &'a [Chapter],
    pub current_chapter: Option<&'a Chapter>,
    pub selected_chapter: Option<&'a Chapter>,
    pub progress: ProgressDisplay,
}

/// A reading session over a single document
#[derive(Debug, Clone)]
pub struct Reader {
    document: Document,
    metrics: PageMetrics,
    layout: Layout,
    controller: ProgressController,
}

impl Reader {
    /// Load a document and compute its first layout
    pub fn new(document: Document, metrics: PageMetrics, config: &EngineConfig) -> Self {
        let layout = build_layout(&document.text, metrics);
        Self {
            document,
            metrics,
            layout,
            controller: ProgressController::new(config),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn metrics(&self) -> PageMetrics {
        self.metrics
    }

    pub fn controller(&self) -> &ProgressController {
        &self.controller
    }

    pub fn current_page(&self) -> usize {
        self.controller.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.layout.total_pages()
    }

    /// Re-paginate for new sizing inputs
    ///
    /// The reader stays on the page containing the start of the page they were
    /// reading. Returns `false` if the metrics did not change.
    pub fn resize(&mut self, metrics: PageMetrics) -> bool {
        if metrics == self.metrics {
            return false;
        }

        let anchor = self
            .layout
            .page(self.current_page())
            .map_or(0, |page| page.start_offset);

        self.metrics = metrics;
        self.layout = build_layout(&self.document.text, metrics);
        let page = locate(&self.layout.pages, anchor);
        self.controller.relayout(&self.layout, page);

        tracing::debug!(
            font_size = metrics.font_size,
            pages = self.layout.total_pages(),
            page,
            "re-paginated after resize"
        );
        true
    }

    pub fn restore_initial_position(&mut self, saved: Progress) -> Option<usize> {
        self.controller.restore_initial_position(&self.layout, saved)
    }

    pub fn go_to_page(&mut self, page: i64, now: Instant) -> Result<bool, NavigationError> {
        self.controller.go_to_page(&self.layout, page, now)
    }

    pub fn next_page(&mut self, now: Instant) -> Result<bool, NavigationError> {
        self.controller.next_page(&self.layout, now)
    }

    pub fn prev_page(&mut self, now: Instant) -> Result<bool, NavigationError> {
        self.controller.prev_page(&self.layout, now)
    }

    pub fn jump_to_chapter(
        &mut self,
        index: usize,
        now: Instant,
    ) -> Result<SaveRequest, NavigationError> {
        self.controller.jump_to_chapter(&self.layout, index, now)
    }

    pub fn clear_chapter_selection(&mut self) {
        self.controller.clear_chapter_selection();
    }

    pub fn poll_save(&mut self, now: Instant) -> Option<SaveRequest> {
        self.controller.poll(now)
    }

    pub fn save_deadline(&self) -> Option<Instant> {
        self.controller.save_deadline()
    }

    pub fn teardown(&mut self) -> Option<SaveRequest> {
        self.controller.teardown(&self.layout)
    }

    pub fn page_hide(&mut self) -> Option<SaveRequest> {
        self.controller.page_hide(&self.layout)
    }

    /// The chapter the current page belongs to
    pub fn current_chapter(&self) -> Option<&Chapter> {
        chapter_at_page(&self.layout.chapters, self.current_page())
            .and_then(|index| self.layout.chapter(index))
    }

    /// Text handed to rendering
    ///
    /// With a chapter selected this is the chapter's full span of the document;
    /// otherwise it is the current page's text.
    pub fn content(&self) -> &str {
        if let Some(text) = self
            .controller
            .selected_chapter()
            .and_then(|index| chapter_text(&self.document.text, &self.layout.chapters, index))
        {
            return text;
        }
        self.layout
            .page(self.current_page())
            .map_or("", |page| page.text.as_str())
    }

    pub fn view(&self) -> ReaderView<'_> {
        ReaderView {
            content: self.content(),
            page_index: self.current_page(),
            total_pages: self.total_pages(),
            chapters: &self.layout.chapters,
            current_chapter: self.current_chapter(),
            selected_chapter: self
                .controller
                .selected_chapter()
                .and_then(|index| self.layout.chapter(index)),
            progress: self.controller.display_progress(&self.layout),
        }
    }
}
