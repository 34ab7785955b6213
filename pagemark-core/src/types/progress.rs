//! Reading position and progress percentage types

use serde::{Deserialize, Serialize};

/// A reading progress percentage in 0..=100
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Progress = Progress(0);

    /// Create a progress value, clamping to 100
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    /// Live progress for a page position: `round((current + 1) / total * 100)`
    pub fn from_position(current_page: usize, total_pages: usize) -> Self {
        if total_pages == 0 {
            return Self::ZERO;
        }
        let ratio = (current_page + 1) as f64 / total_pages as f64;
        Self((ratio * 100.0).round().clamp(0.0, 100.0) as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Page a saved percentage maps back to: `floor(percent / 100 * total)`, clamped
    pub fn target_page(self, total_pages: usize) -> usize {
        if total_pages == 0 {
            return 0;
        }
        let target = (f64::from(self.0) / 100.0 * total_pages as f64).floor() as usize;
        target.min(total_pages - 1)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for Progress {
    fn from(percent: u8) -> Self {
        Self::new(percent)
    }
}

/// The progress value shown to the reader
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressDisplay {
    pub percent: Progress,

    /// True while the value is the placeholder carried over from an earlier session
    pub from_previous_session: bool,
}

/// Where the reader currently is
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingPosition {
    pub current_page: usize,

    /// Index of the chapter the reader explicitly jumped to, if any
    pub selected_chapter: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_position() {
        assert_eq!(Progress::from_position(0, 10).percent(), 10);
        assert_eq!(Progress::from_position(9, 10).percent(), 100);
        assert_eq!(Progress::from_position(0, 3).percent(), 33);
        assert_eq!(Progress::from_position(1, 3).percent(), 67);
        assert_eq!(Progress::from_position(0, 0), Progress::ZERO);
    }

    #[test]
    fn test_target_page() {
        assert_eq!(Progress::new(40).target_page(10), 4);
        assert_eq!(Progress::new(100).target_page(10), 9);
        assert_eq!(Progress::new(0).target_page(10), 0);
        assert_eq!(Progress::new(50).target_page(0), 0);
    }

    #[test]
    fn test_progress_clamps() {
        assert_eq!(Progress::new(250).percent(), 100);
    }

    #[test]
    fn test_progress_serializes_as_number() {
        let json = serde_json::to_string(&Progress::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
