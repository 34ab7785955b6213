//! Attaching page indices to chapters

use crate::classifier::classify;
use crate::paginate::paginate;
use crate::position::locate;
use crate::types::{Chapter, Layout, Page, PageMetrics};
use std::ops::Range;

/// Fill in `page_index` for every chapter
pub fn bind(chapters: Vec<Chapter>, pages: &[Page]) -> Vec<Chapter> {
    chapters
        .into_iter()
        .map(|chapter| {
            let page_index = locate(pages, chapter.source_offset);
            chapter.with_page_index(page_index)
        })
        .collect()
}

/// Pages `[start, end)` that belong to the chapter at `index`
///
/// `start` is the chapter's own page. `end` is the page of the next chapter that
/// starts later in the text on a strictly later page, or `total_pages` if there
/// is none. Later chapters that share the start page are skipped here but stay
/// navigable on their own.
pub fn chapter_range(index: usize, chapters: &[Chapter], total_pages: usize) -> Range<usize> {
    let Some(chapter) = chapters.get(index) else {
        return 0..0;
    };

    let end = chapters[index + 1..]
        .iter()
        .find(|next| {
            next.page_index > chapter.page_index && next.source_offset > chapter.source_offset
        })
        .map_or(total_pages, |next| next.page_index);

    chapter.page_index..end.max(chapter.page_index)
}

/// Full text of the chapter at `index`, from its heading to the next heading
pub fn chapter_text<'a>(text: &'a str, chapters: &[Chapter], index: usize) -> Option<&'a str> {
    let chapter = chapters.get(index)?;
    let end = chapters
        .get(index + 1)
        .map_or(text.len(), |next| next.source_offset);
    text.get(chapter.source_offset..end.max(chapter.source_offset))
}

/// Index of the chapter the given page belongs to: the last one starting on or before it
pub fn chapter_at_page(chapters: &[Chapter], page: usize) -> Option<usize> {
    chapters
        .partition_point(|chapter| chapter.page_index <= page)
        .checked_sub(1)
}

/// Classify, paginate and bind a document in one pass
pub fn build_layout(text: &str, metrics: PageMetrics) -> Layout {
    let pages = paginate(text, metrics);
    let chapters = bind(classify(text), &pages);
    Layout { pages, chapters }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(title: &str, offset: usize, page: usize) -> Chapter {
        Chapter::new(title, offset).with_page_index(page)
    }

    #[test]
    fn test_single_page_scenario() {
        let layout = build_layout("# A\nfoo\n# B\nbar", PageMetrics::new(16, 10_000.0));

        assert_eq!(layout.total_pages(), 1);
        assert_eq!(layout.chapters.len(), 2);
        assert_eq!(layout.chapters[0].title, "A");
        assert_eq!(layout.chapters[0].page_index, 0);
        assert_eq!(layout.chapters[1].title, "B");
        assert_eq!(layout.chapters[1].page_index, 0);
    }

    #[test]
    fn test_bind_uses_start_offsets() {
        // "# Two" sits below the start of the second page
        let text = "# One\na\nb\nc\nd\n# Two\ne";
        let layout = build_layout(text, PageMetrics::new(16, 28.8 * 4.0 + 0.1));

        assert_eq!(layout.pages[1].start_offset, 12);
        assert_eq!(layout.chapters[1].source_offset, 14);
        let pages: Vec<usize> = layout.chapters.iter().map(|c| c.page_index).collect();
        assert_eq!(pages, vec![0, 1]);
    }

    #[test]
    fn test_chapter_range_to_next_chapter() {
        let chapters = vec![chapter("A", 0, 2), chapter("B", 50, 5), chapter("C", 90, 8)];
        assert_eq!(chapter_range(0, &chapters, 10), 2..5);
        assert_eq!(chapter_range(1, &chapters, 10), 5..8);
        assert_eq!(chapter_range(2, &chapters, 10), 8..10);
    }

    #[test]
    fn test_chapter_range_skips_same_page_chapters() {
        let chapters = vec![chapter("A", 0, 2), chapter("A.1", 20, 2), chapter("B", 60, 4)];
        assert_eq!(chapter_range(0, &chapters, 6), 2..4);
        assert_eq!(chapter_range(1, &chapters, 6), 2..4);
    }

    #[test]
    fn test_chapter_range_out_of_bounds() {
        assert_eq!(chapter_range(3, &[], 10), 0..0);
    }

    #[test]
    fn test_chapter_text_spans_to_next_heading() {
        let text = "# A\nfoo\n# B\nbar";
        let chapters = classify(text);

        assert_eq!(chapter_text(text, &chapters, 0), Some("# A\nfoo\n"));
        assert_eq!(chapter_text(text, &chapters, 1), Some("# B\nbar"));
        assert_eq!(chapter_text(text, &chapters, 2), None);
    }

    #[test]
    fn test_chapter_at_page() {
        let chapters = vec![chapter("A", 10, 1), chapter("B", 50, 3)];
        assert_eq!(chapter_at_page(&chapters, 0), None);
        assert_eq!(chapter_at_page(&chapters, 1), Some(0));
        assert_eq!(chapter_at_page(&chapters, 2), Some(0));
        assert_eq!(chapter_at_page(&chapters, 7), Some(1));
    }
}
