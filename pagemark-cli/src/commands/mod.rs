//! CLI command implementations

mod chapters;
mod info;
mod paginate;
mod restore;
mod scan;
mod show;

pub use chapters::chapters;
pub use info::info;
pub use paginate::paginate;
pub use restore::restore;
pub use scan::scan;
pub use show::show;

use anyhow::{Context, Result};
use clap::Args;
use pagemark_core::config::DEFAULT_FONT_SIZE;
use pagemark_core::{Document, EngineConfig, PageMetrics, Reader};
use std::path::Path;

/// File extensions read as documents
pub(crate) const TEXT_EXTENSIONS: [&str; 4] = ["txt", "text", "md", "markdown"];

/// Viewport the document is laid out for
#[derive(Args, Debug, Clone)]
pub struct Viewport {
    /// Font size in pixels (clamped to 12-24)
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    pub font_size: u32,

    /// Available reading height in pixels
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,
}

impl Viewport {
    pub fn metrics(&self) -> PageMetrics {
        PageMetrics::new(self.font_size, self.height)
    }
}

/// Read a text file as a document titled after its file stem
pub(crate) fn load_document(input: &str) -> Result<Document> {
    let path = Path::new(input);
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", input))?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled");
    Ok(Document::new(title, text))
}

/// Load a document and lay it out for the viewport
pub(crate) fn open_reader(input: &str, viewport: &Viewport) -> Result<Reader> {
    let document = load_document(input)?;
    let reader = Reader::new(document, viewport.metrics(), &EngineConfig::default());
    tracing::debug!(
        pages = reader.total_pages(),
        chapters = reader.layout().chapters.len(),
        "Laid out {}",
        input
    );
    Ok(reader)
}

/// First non-blank line of a page, shortened for listings
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if line.chars().count() > max_chars {
        let cut: String = line.chars().take(max_chars).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}
