//! Line iteration that keeps track of byte offsets

/// Iterate over `\n`-separated lines together with the byte offset each begins at.
///
/// Lines keep any trailing `\r`; callers trim as they need. An empty input yields a
/// single empty line at offset 0.
pub(crate) fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        (start, line)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_track_line_starts() {
        let lines: Vec<_> = lines_with_offsets("ab\n\ncd").collect();
        assert_eq!(lines, vec![(0, "ab"), (3, ""), (4, "cd")]);
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let lines: Vec<_> = lines_with_offsets("").collect();
        assert_eq!(lines, vec![(0, "")]);
    }

    #[test]
    fn test_multibyte_offsets() {
        let lines: Vec<_> = lines_with_offsets("第一章\n正文").collect();
        assert_eq!(lines, vec![(0, "第一章"), (10, "正文")]);
    }
}
