//! Show command implementation

use super::{open_reader, Viewport};
use anyhow::{Context, Result};
use tokio::time::Instant;

/// Print one page, or the whole chapter when `chapter` is given
pub fn show(input: &str, page: usize, chapter: Option<usize>, viewport: &Viewport) -> Result<()> {
    let mut reader = open_reader(input, viewport)?;
    let now = Instant::now();

    match chapter {
        Some(index) => {
            reader
                .jump_to_chapter(index, now)
                .with_context(|| format!("Cannot show chapter {} of {}", index, input))?;
        }
        None => {
            reader.go_to_page(i64::try_from(page).unwrap_or(i64::MAX), now)?;
        }
    }

    let view = reader.view();
    println!("{}", view.content);
    println!();

    let mut footer = format!("-- page {} / {}", view.page_index + 1, view.total_pages);
    if let Some(chapter) = view.selected_chapter.or(view.current_chapter) {
        footer.push_str(&format!(" · {}", chapter.title));
    }
    footer.push_str(&format!(" · {}% --", view.progress.percent.percent()));
    println!("{}", footer);

    Ok(())
}
