//! Chapters command implementation

use super::{open_reader, Viewport};
use anyhow::Result;
use pagemark_core::{chapter_range, Chapter};
use serde::Serialize;

#[derive(Serialize)]
struct ChapterEntry<'a> {
    index: usize,
    #[serde(flatten)]
    chapter: &'a Chapter,
    /// Pages the chapter spans, end exclusive
    pages: [usize; 2],
}

/// List detected chapters and the pages they start on
pub fn chapters(input: &str, viewport: &Viewport, json: bool) -> Result<()> {
    let reader = open_reader(input, viewport)?;
    let layout = reader.layout();

    let entries: Vec<ChapterEntry<'_>> = layout
        .chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| {
            let range = chapter_range(index, &layout.chapters, layout.total_pages());
            ChapterEntry {
                index,
                chapter,
                pages: [range.start, range.end],
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No chapters detected");
        return Ok(());
    }

    for entry in &entries {
        let indent = "  ".repeat(usize::from(entry.chapter.level.saturating_sub(1)));
        println!(
            "{:>3}. {}{}  (page {}, {} pages)",
            entry.index,
            indent,
            entry.chapter.title,
            entry.chapter.page_index,
            entry.pages[1] - entry.pages[0]
        );
    }

    Ok(())
}
