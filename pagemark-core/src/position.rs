//! Offset to page lookup

use crate::types::Page;

/// Index of the page that begins at or before `offset`
///
/// Binary search over the pages' start offsets. Offsets before the first page
/// map to page 0 and offsets past the last page's start map to the last page,
/// so the result is always a valid index for a non-empty page list.
pub fn locate(pages: &[Page], offset: usize) -> usize {
    pages
        .partition_point(|page| page.start_offset <= offset)
        .saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages_at(starts: &[usize]) -> Vec<Page> {
        starts
            .iter()
            .enumerate()
            .map(|(index, &start)| Page {
                index,
                text: String::new(),
                start_offset: start,
                end_offset: starts.get(index + 1).copied().unwrap_or(start + 10),
            })
            .collect()
    }

    #[test]
    fn test_exact_and_inner_offsets() {
        let pages = pages_at(&[0, 10, 25, 40]);
        assert_eq!(locate(&pages, 0), 0);
        assert_eq!(locate(&pages, 9), 0);
        assert_eq!(locate(&pages, 10), 1);
        assert_eq!(locate(&pages, 24), 1);
        assert_eq!(locate(&pages, 25), 2);
        assert_eq!(locate(&pages, 41), 3);
    }

    #[test]
    fn test_offset_before_first_page() {
        let pages = pages_at(&[5, 10]);
        assert_eq!(locate(&pages, 2), 0);
    }

    #[test]
    fn test_offset_past_end() {
        let pages = pages_at(&[0, 10, 20]);
        assert_eq!(locate(&pages, 10_000), 2);
    }

    #[test]
    fn test_empty_pages() {
        assert_eq!(locate(&[], 7), 0);
    }
}
