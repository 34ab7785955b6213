//! Estimated pagination of raw text
//!
//! Real text measurement needs a rendered surface, so page breaks are estimated
//! from line counts instead: every non-empty line costs `font_size * 1.8` and a
//! blank line half of that. The estimate is deliberate and must stay stable so
//! that saved percentages keep mapping to the same pages.
//!
//! The text is cut into units at `#` heading lines, so every heading opens a
//! unit. A page is never closed on the first line of a unit: a heading that
//! overflows stays on the current page and the break falls after it.

use crate::classifier::is_heading_line;
use crate::lines::lines_with_offsets;
use crate::types::{Page, PageMetrics};

/// Accumulates lines until the estimated height budget is spent
struct PageBuilder<'a> {
    text: &'a str,
    pages: Vec<Page>,
    start: usize,
    lines: usize,
    height: f64,
}

impl<'a> PageBuilder<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pages: Vec::new(),
            start: 0,
            lines: 0,
            height: 0.0,
        }
    }

    fn close(&mut self, end: usize) {
        self.pages.push(Page {
            index: self.pages.len(),
            text: self.text[self.start..end].trim_end().to_string(),
            start_offset: self.start,
            end_offset: end,
        });
        self.start = end;
        self.lines = 0;
        self.height = 0.0;
    }

    /// Add a line, first closing the current page if the line would overflow it.
    /// An empty page always takes the line, so no page is ever empty of lines,
    /// and the first line of a unit never forces a close.
    fn push_line(&mut self, offset: usize, height: f64, budget: f64, opens_unit: bool) {
        if self.height + height > budget && self.lines > 0 && !opens_unit {
            self.close(offset);
        }
        self.lines += 1;
        self.height += height;
    }

    fn finish(mut self) -> Vec<Page> {
        if self.lines > 0 {
            self.close(self.text.len());
        }
        self.pages
    }
}

/// Split text into estimated pages
///
/// Pages tile the document: each page's `end_offset` is the next page's
/// `start_offset` and the last page ends at `text.len()`. Any input, even an
/// empty one, produces at least one page.
pub fn paginate(text: &str, metrics: PageMetrics) -> Vec<Page> {
    let budget = metrics.available_height;
    let line_height = metrics.line_height();
    let blank_height = metrics.blank_line_height();

    let mut builder = PageBuilder::new(text);
    for (offset, line) in lines_with_offsets(text) {
        let height = if line.trim().is_empty() {
            blank_height
        } else {
            line_height
        };
        builder.push_line(offset, height, budget, is_heading_line(line));
    }

    let pages = builder.finish();
    tracing::debug!(
        pages = pages.len(),
        font_size = metrics.font_size,
        height = metrics.available_height,
        "paginated document"
    );
    pages
}
