//! Line/column lookup for byte offsets.
//!
//! Positions only store byte spans. Lines and columns are computed on
//! demand when a diagnostic is rendered.

/// Byte offset of every line start in a text, for O(log L) lookups.
///
/// ```
/// use tern_diagnostic::LineIndex;
///
/// let text = "line1\nline2\nline3";
/// let index = LineIndex::new(text);
///
/// assert_eq!(index.line_col(text, 0), (1, 1));
/// assert_eq!(index.line_col(text, 6), (2, 1));
/// assert_eq!(index.line_col(text, 14), (3, 3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    /// `starts[0] == 0`; `starts[n]` is the byte after the n-th `\n`.
    starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0u32];
        starts.extend(
            newline_offsets(text).map(|i| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        LineIndex { starts }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line(&self, offset: u32) -> u32 {
        let idx = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based `(line, column)`. The column counts characters, not bytes.
    pub fn line_col(&self, text: &str, offset: u32) -> (u32, u32) {
        let line = self.line(offset);
        let start = self.line_start(line).unwrap_or(0) as usize;
        let end = (offset as usize).min(text.len());
        let col = text
            .get(start..end)
            .map_or(0, |prefix| prefix.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Byte offset where the 1-based `line` starts.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        let idx = line.checked_sub(1)?;
        self.starts.get(idx as usize).copied()
    }

    /// Text of the 1-based `line` without its line terminator.
    pub fn line_text<'a>(&self, text: &'a str, line: u32) -> Option<&'a str> {
        let start = self.line_start(line)? as usize;
        let end = self
            .line_start(line + 1)
            .map_or(text.len(), |next| next as usize);
        let slice = text.get(start..end)?;
        Some(slice.trim_end_matches(['\n', '\r']))
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

fn newline_offsets(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.bytes()
        .enumerate()
        .filter_map(|(i, b)| (b == b'\n').then_some(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lookup() {
        let text = "a\nbc\n\nd";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line(0), 1);
        assert_eq!(index.line(1), 1);
        assert_eq!(index.line(2), 2);
        assert_eq!(index.line(5), 3);
        assert_eq!(index.line(6), 4);
    }

    #[test]
    fn test_columns_count_chars() {
        let text = "é = 1";
        let index = LineIndex::new(text);
        // 'é' is two bytes but one column.
        assert_eq!(index.line_col(text, 2), (1, 2));
    }

    #[test]
    fn test_line_text_strips_terminator() {
        let text = "first\r\nsecond\nthird";
        let index = LineIndex::new(text);
        assert_eq!(index.line_text(text, 1), Some("first"));
        assert_eq!(index.line_text(text, 2), Some("second"));
        assert_eq!(index.line_text(text, 3), Some("third"));
        assert_eq!(index.line_text(text, 4), None);
        assert_eq!(index.line_text(text, 0), None);
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let text = "ab";
        let index = LineIndex::new(text);
        assert_eq!(index.line_col(text, 10), (1, 3));
    }
}
