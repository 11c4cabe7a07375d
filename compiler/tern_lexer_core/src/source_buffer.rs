//! Sentinel-terminated copy of the source text.

use crate::Cursor;

/// Trailing zero bytes after the text. Covers the sentinel plus the two
/// bytes `Cursor::peek` and `Cursor::peek2` may read past the end.
const PADDING: usize = 4;

/// The source bytes followed by `0x00` padding.
///
/// The scanner stops on the `0x00` sentinel instead of checking bounds on
/// every byte. A `0x00` inside the text is told apart from the sentinel by
/// comparing the position against [`len()`](Self::len).
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    buf: Vec<u8>,
    source_len: u32,
}

impl SourceBuffer {
    /// Texts longer than `u32::MAX` bytes are cut at that point.
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let source_len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        let kept = &bytes[..source_len as usize];

        let mut buf = Vec::with_capacity(kept.len() + PADDING);
        buf.extend_from_slice(kept);
        buf.resize(kept.len() + PADDING, 0);

        SourceBuffer { buf, source_len }
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    pub fn len(&self) -> u32 {
        self.source_len
    }

    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// The text bytes without the padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_is_zeroed() {
        let buffer = SourceBuffer::new("ab");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.as_bytes(), b"ab");
        let cursor = buffer.cursor();
        assert_eq!(cursor.current(), b'a');
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(cursor.peek2(), 0);
    }

    #[test]
    fn test_empty_source_is_eof() {
        let buffer = SourceBuffer::new("");
        assert!(buffer.is_empty());
        assert!(buffer.cursor().is_eof());
    }
}
