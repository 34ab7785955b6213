//! Layout output for one (document, metrics) pair

use super::{Chapter, Page};
use crate::config::{BLANK_LINE_RATIO, LINE_HEIGHT_FACTOR, MAX_FONT_SIZE, MIN_FONT_SIZE};
use serde::{Deserialize, Serialize};

/// Sizing inputs for pagination
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PageMetrics {
    /// Font size in pixels
    pub font_size: u32,

    /// Vertical space available for one page, in pixels
    pub available_height: f64,
}

impl PageMetrics {
    /// Create metrics, clamping the font size to the supported range
    pub fn new(font_size: u32, available_height: f64) -> Self {
        Self {
            font_size: font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            available_height: available_height.max(0.0),
        }
    }

    /// Estimated height of a non-empty line
    pub fn line_height(&self) -> f64 {
        f64::from(self.font_size) * LINE_HEIGHT_FACTOR
    }

    /// Estimated height of a blank line
    pub fn blank_line_height(&self) -> f64 {
        self.line_height() * BLANK_LINE_RATIO
    }
}

/// Pages and bound chapters computed for a document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub chapters: Vec<Chapter>,
}

impl Layout {
    /// Number of pages
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Index of the last page (0 for an empty layout)
    pub fn last_page(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_line_heights() {
        let metrics = PageMetrics::new(20, 600.0);
        assert!((metrics.line_height() - 36.0).abs() < f64::EPSILON);
        assert!((metrics.blank_line_height() - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_clamp_font_size() {
        assert_eq!(PageMetrics::new(4, 100.0).font_size, MIN_FONT_SIZE);
        assert_eq!(PageMetrics::new(72, 100.0).font_size, MAX_FONT_SIZE);
        assert_eq!(PageMetrics::new(16, -5.0).available_height, 0.0);
    }
}
