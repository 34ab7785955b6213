//! Paginate command implementation

use super::{open_reader, preview, Viewport};
use anyhow::Result;

/// Print the page boundaries of a document
pub fn paginate(input: &str, viewport: &Viewport, json: bool) -> Result<()> {
    let reader = open_reader(input, viewport)?;
    let pages = &reader.layout().pages;

    if json {
        println!("{}", serde_json::to_string_pretty(pages)?);
        return Ok(());
    }

    for page in pages {
        println!(
            "{:>5}  {:>8}..{:<8}  {}",
            page.index,
            page.start_offset,
            page.end_offset,
            preview(&page.text, 60)
        );
    }
    println!("{} pages", pages.len());

    Ok(())
}
