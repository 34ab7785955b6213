//! Engine constants and tunables

use std::time::Duration;

/// Estimated line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f64 = 1.8;

/// Blank lines are assumed to render at this fraction of a full line
pub const BLANK_LINE_RATIO: f64 = 0.5;

/// Quiet window before a debounced progress save is sent
pub const SAVE_DEBOUNCE: Duration = Duration::from_secs(3);

/// Default reader font size in pixels
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Smallest font size the reader offers
pub const MIN_FONT_SIZE: u32 = 12;

/// Largest font size the reader offers
pub const MAX_FONT_SIZE: u32 = 24;

/// Runtime settings for a reading session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Debounce window for progress saves
    pub save_debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            save_debounce: SAVE_DEBOUNCE,
        }
    }
}

impl EngineConfig {
    /// Override the debounce window
    pub fn with_save_debounce(mut self, delay: Duration) -> Self {
        self.save_debounce = delay;
        self
    }
}
