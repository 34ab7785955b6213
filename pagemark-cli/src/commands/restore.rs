//! Restore command implementation

use super::{open_reader, Viewport};
use anyhow::Result;
use pagemark_core::Progress;

/// Show which page a saved progress percentage restores to
pub fn restore(input: &str, percent: u8, viewport: &Viewport) -> Result<()> {
    let mut reader = open_reader(input, viewport)?;

    // 0% is recorded but leaves the reader on the first page
    let page = reader
        .restore_initial_position(Progress::new(percent))
        .unwrap_or_else(|| reader.current_page());
    let display = reader.controller().display_progress(reader.layout());

    println!(
        "{}% restores to page {} of {}",
        percent,
        page + 1,
        reader.total_pages()
    );
    println!("Progress shown: {}%", display.percent.percent());
    if let Some(chapter) = reader.current_chapter() {
        println!("Chapter:        {}", chapter.title);
    }

    Ok(())
}
