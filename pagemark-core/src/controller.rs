//! Navigation and progress state machine
//!
//! The controller owns the reading position and decides when progress must be
//! persisted. It never performs I/O itself: transitions hand back
//! [`SaveRequest`]s, either immediately (chapter jumps, teardown, page hide) or
//! through [`ProgressController::poll`] once the debounce window has elapsed.
//! Every transition takes the current [`Layout`] so the controller stays valid
//! across re-pagination.

use crate::binder::chapter_range;
use crate::config::EngineConfig;
use crate::debounce::Debouncer;
use crate::error::NavigationError;
use crate::types::{Layout, Progress, ProgressDisplay, ReadingPosition};
use serde::Serialize;
use tokio::time::Instant;

/// Why a save was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveTrigger {
    /// The debounce window after paging elapsed
    Debounced,
    /// The reader jumped to a chapter
    ChapterJump,
    /// The reading session is shutting down
    Teardown,
    /// The host page is being hidden or navigated away from
    PageHide,
}

/// A progress value that should be written to the progress store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub progress: Progress,
    pub trigger: SaveTrigger,
}

impl SaveRequest {
    pub fn is_immediate(&self) -> bool {
        self.trigger != SaveTrigger::Debounced
    }
}

/// Reading position plus save scheduling for one session
#[derive(Debug, Clone)]
pub struct ProgressController {
    position: ReadingPosition,
    saved_progress: Progress,
    restored: bool,
    navigated: bool,
    closed: bool,
    debouncer: Debouncer<Progress>,
}

impl ProgressController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            position: ReadingPosition::default(),
            saved_progress: Progress::ZERO,
            restored: false,
            navigated: false,
            closed: false,
            debouncer: Debouncer::new(config.save_debounce),
        }
    }

    pub fn position(&self) -> ReadingPosition {
        self.position
    }

    pub fn current_page(&self) -> usize {
        self.position.current_page
    }

    pub fn selected_chapter(&self) -> Option<usize> {
        self.position.selected_chapter
    }

    /// The progress loaded from the store at session start
    pub fn saved_progress(&self) -> Progress {
        self.saved_progress
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Progress computed from the current page
    pub fn live_progress(&self, layout: &Layout) -> Progress {
        Progress::from_position(self.position.current_page, layout.total_pages())
    }

    /// The value to show the reader
    ///
    /// Until the reader navigates, a position still on the first page shows the
    /// previous session's percentage instead of the live value.
    pub fn display_progress(&self, layout: &Layout) -> ProgressDisplay {
        if !self.navigated && self.position.current_page == 0 && !self.saved_progress.is_zero() {
            return ProgressDisplay {
                percent: self.saved_progress,
                from_previous_session: true,
            };
        }
        ProgressDisplay {
            percent: self.live_progress(layout),
            from_previous_session: false,
        }
    }

    /// Move to the page a previously saved percentage points at
    ///
    /// Runs at most once per session, only once pages exist, and never after the
    /// reader has navigated. A zero percentage is recorded but moves nothing.
    /// Restoring does not schedule a save.
    pub fn restore_initial_position(&mut self, layout: &Layout, saved: Progress) -> Option<usize> {
        if self.restored || self.navigated || layout.total_pages() == 0 {
            return None;
        }
        self.restored = true;
        self.saved_progress = saved;
        if saved.is_zero() {
            return None;
        }

        let target = saved.target_page(layout.total_pages());
        self.position.current_page = target;
        self.enforce_chapter_bounds(layout);
        tracing::info!(
            percent = saved.percent(),
            page = target,
            "restored reading position"
        );
        Some(target)
    }

    /// Move to page `page`, clamped to the layout
    ///
    /// Returns `Ok(false)` without touching any state when the reader is already
    /// on the first or last page and asks to go past it. Otherwise the chapter
    /// selection is cleared and a debounced save is scheduled.
    pub fn go_to_page(
        &mut self,
        layout: &Layout,
        page: i64,
        now: Instant,
    ) -> Result<bool, NavigationError> {
        if self.closed {
            return Err(NavigationError::SessionClosed);
        }
        if layout.total_pages() == 0 {
            return Ok(false);
        }

        let last = layout.last_page() as i64;
        let target = page.clamp(0, last);
        if target != page && target as usize == self.position.current_page {
            return Ok(false);
        }

        self.position.current_page = target as usize;
        self.position.selected_chapter = None;
        self.navigated = true;
        self.debouncer.schedule(self.live_progress(layout), now);
        Ok(true)
    }

    pub fn next_page(&mut self, layout: &Layout, now: Instant) -> Result<bool, NavigationError> {
        self.go_to_page(layout, self.position.current_page as i64 + 1, now)
    }

    pub fn prev_page(&mut self, layout: &Layout, now: Instant) -> Result<bool, NavigationError> {
        self.go_to_page(layout, self.position.current_page as i64 - 1, now)
    }

    /// Jump to the chapter at `index` and lock the view onto it
    ///
    /// Schedules a debounced save and also returns an immediate one; both carry
    /// the same value.
    pub fn jump_to_chapter(
        &mut self,
        layout: &Layout,
        index: usize,
        now: Instant,
    ) -> Result<SaveRequest, NavigationError> {
        if self.closed {
            return Err(NavigationError::SessionClosed);
        }
        let chapter = layout
            .chapter(index)
            .ok_or(NavigationError::NoSuchChapter(index))?;

        self.position.current_page = chapter.page_index.min(layout.last_page());
        self.position.selected_chapter = Some(index);
        self.navigated = true;

        let progress = self.live_progress(layout);
        self.debouncer.schedule(progress, now);
        Ok(SaveRequest {
            progress,
            trigger: SaveTrigger::ChapterJump,
        })
    }

    /// Drop the chapter lock without moving or saving
    pub fn clear_chapter_selection(&mut self) {
        self.position.selected_chapter = None;
    }

    /// Adopt a recomputed layout, placing the reader on `page`
    ///
    /// Used after a font size or viewport change. Neither restores nor saves;
    /// a pending debounced save keeps its deadline but carries the percentage
    /// of the new layout.
    pub fn relayout(&mut self, layout: &Layout, page: usize) {
        self.position.current_page = page.min(layout.last_page());
        self.enforce_chapter_bounds(layout);
        self.debouncer.refresh(self.live_progress(layout));
    }

    /// Release the debounced save if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<SaveRequest> {
        if self.closed {
            return None;
        }
        self.debouncer.take_due(now).map(|progress| SaveRequest {
            progress,
            trigger: SaveTrigger::Debounced,
        })
    }

    /// When the pending debounced save becomes due
    pub fn save_deadline(&self) -> Option<Instant> {
        if self.closed {
            return None;
        }
        self.debouncer.deadline()
    }

    /// Close the session, replacing any pending save with an immediate one
    pub fn teardown(&mut self, layout: &Layout) -> Option<SaveRequest> {
        if self.closed {
            return None;
        }
        self.closed = true;
        self.flush(layout, SaveTrigger::Teardown)
    }

    /// Flush immediately because the host page is going away; the session stays open
    pub fn page_hide(&mut self, layout: &Layout) -> Option<SaveRequest> {
        if self.closed {
            return None;
        }
        self.flush(layout, SaveTrigger::PageHide)
    }

    fn flush(&mut self, layout: &Layout, trigger: SaveTrigger) -> Option<SaveRequest> {
        self.debouncer.cancel();
        if layout.total_pages() == 0 {
            return None;
        }
        Some(SaveRequest {
            progress: self.live_progress(layout),
            trigger,
        })
    }

    /// Clear the chapter lock once the current page leaves the chapter's range
    fn enforce_chapter_bounds(&mut self, layout: &Layout) {
        if let Some(selected) = self.position.selected_chapter {
            let range = chapter_range(selected, &layout.chapters, layout.total_pages());
            if !range.contains(&self.position.current_page) {
                self.position.selected_chapter = None;
            }
        }
    }
}
