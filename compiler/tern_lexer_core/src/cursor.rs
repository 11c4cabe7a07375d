//! Forward byte cursor over a [`SourceBuffer`](crate::SourceBuffer).
//!
//! EOF is the `0x00` sentinel at `source_len`. Reads past the current byte
//! (`peek`, `peek2`) land in zero padding near the end, so no call here
//! needs a bounds check of its own.

/// Earlier of two `memchr` hits.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Byte cursor. `Copy`, so a scanner can snapshot it for lookahead.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
    source_len: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!((source_len as usize) < buf.len(), "missing sentinel");
        Cursor {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte under the cursor; `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(self.pos + 2)
    }

    #[inline]
    fn byte_at(&self, pos: u32) -> u8 {
        self.buf.get(pos as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.advance_n(1);
    }

    /// Move forward `n` bytes, never past the sentinel.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos = self.pos.saturating_add(n).min(self.source_len);
    }

    /// True at the sentinel. A `0x00` byte inside the text is not EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Advance while `pred` holds. `pred(0)` must be false so the
    /// sentinel stops the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Width of the UTF-8 sequence introduced by `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Step over one whole character.
    #[inline]
    pub fn advance_char(&mut self) {
        self.advance_n(Self::utf8_char_width(self.current()));
    }

    fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos as usize..self.source_len as usize]
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets are bounded by source_len, a u32"
    )]
    fn jump(&mut self, found: Option<usize>) -> u8 {
        match found {
            Some(offset) => {
                self.pos += offset as u32;
                self.current()
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Move to the next `\n`, or to EOF.
    pub fn eat_until_newline_or_eof(&mut self) {
        let found = memchr::memchr(b'\n', self.remaining());
        self.jump(found);
    }

    /// Move to the next `quote`, `\` or line break inside a quoted
    /// literal. Returns the byte found, `0` at EOF.
    pub fn skip_to_quote_delim(&mut self, quote: u8) -> u8 {
        let remaining = self.remaining();
        let primary = memchr::memchr3(quote, b'\\', b'\n', remaining);
        let cr = memchr::memchr(b'\r', remaining);
        self.jump(earliest_of(primary, cr))
    }

    /// Move to the next backtick or line break. Backtick names have no
    /// escapes.
    pub fn skip_to_backtick_delim(&mut self) -> u8 {
        let found = memchr::memchr3(b'`', b'\n', b'\r', self.remaining());
        self.jump(found)
    }

    /// Move past the next `*/`, or to EOF if the comment never closes.
    /// Returns whether the terminator was found.
    pub fn eat_block_comment_body(&mut self) -> bool {
        let found = memchr::memmem::find(self.remaining(), b"*/");
        let closed = found.is_some();
        self.jump(found);
        if closed {
            self.advance_n(2);
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use crate::SourceBuffer;

    #[test]
    fn test_advance_stops_at_sentinel() {
        let buffer = SourceBuffer::new("abc");
        let mut cursor = buffer.cursor();
        cursor.advance_n(10);
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn test_interior_null_is_not_eof() {
        let buffer = SourceBuffer::new("a\0b");
        let mut cursor = buffer.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert!(!cursor.is_eof());
    }

    #[test]
    fn test_skip_to_quote_delim() {
        let buffer = SourceBuffer::new(r#"abc\"def""#);
        let mut cursor = buffer.cursor();
        assert_eq!(cursor.skip_to_quote_delim(b'"'), b'\\');
        assert_eq!(cursor.pos(), 3);
        cursor.advance_n(2);
        assert_eq!(cursor.skip_to_quote_delim(b'"'), b'"');
        assert_eq!(cursor.pos(), 8);
    }

    #[test]
    fn test_skip_to_quote_delim_stops_at_cr() {
        let buffer = SourceBuffer::new("ab\r\n\"");
        let mut cursor = buffer.cursor();
        assert_eq!(cursor.skip_to_quote_delim(b'"'), b'\r');
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn test_block_comment_body() {
        let buffer = SourceBuffer::new("x */ y");
        let mut cursor = buffer.cursor();
        assert!(cursor.eat_block_comment_body());
        assert_eq!(cursor.pos(), 4);

        let open = SourceBuffer::new("never closed");
        let mut cursor = open.cursor();
        assert!(!cursor.eat_block_comment_body());
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_advance_char_multibyte() {
        let buffer = SourceBuffer::new("é!");
        let mut cursor = buffer.cursor();
        cursor.advance_char();
        assert_eq!(cursor.current(), b'!');
    }
}
