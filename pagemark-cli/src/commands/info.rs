//! Info command implementation

use super::{open_reader, Viewport};
use anyhow::Result;
use pagemark_core::{classify_with_tier, Tier};
use serde::Serialize;

/// Document info output
#[derive(Serialize)]
struct DocumentInfo {
    title: String,
    bytes: usize,
    lines: usize,
    font_size: u32,
    height: f64,
    pages: usize,
    chapters: usize,
    detected_by: Option<Tier>,
}

/// Display information about a document
pub fn info(input: &str, viewport: &Viewport, json: bool) -> Result<()> {
    let reader = open_reader(input, viewport)?;
    let document = reader.document();
    let metrics = reader.metrics();

    let info = DocumentInfo {
        title: document.title.clone(),
        bytes: document.text.len(),
        lines: document.text.lines().count(),
        font_size: metrics.font_size,
        height: metrics.available_height,
        pages: reader.total_pages(),
        chapters: reader.layout().chapters.len(),
        detected_by: classify_with_tier(&document.text).tier,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:       {}", info.title);
        println!("Size:        {} bytes, {} lines", info.bytes, info.lines);
        println!("Viewport:    {}px font, {}px height", info.font_size, info.height);
        println!("Pages:       {}", info.pages);
        println!("Chapters:    {}", info.chapters);
        if let Some(tier) = info.detected_by {
            println!("Detected by: {:?}", tier);
        }
    }

    Ok(())
}
