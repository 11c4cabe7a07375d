//! Hand-written scanner producing `(RawTag, len)` pairs.
//!
//! Dispatch is on the first byte. Each arm advances the cursor over one
//! token and returns its tag; malformed input is encoded in the tag, never
//! as an error value. The sentinel dispatches to EOF.

use crate::cursor::Cursor;
use crate::tag::{RawTag, RawToken};

/// Allocation-free scanner over one source.
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> RawScanner<'a> {
    pub fn new(cursor: Cursor<'a>) -> Self {
        RawScanner { cursor }
    }

    /// Byte offset where the next token starts.
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Scan one token. Returns `Eof` with `len == 0` once the text is
    /// exhausted, and keeps returning it.
    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();
        if self.cursor.is_eof() {
            return RawToken {
                tag: RawTag::Eof,
                len: 0,
            };
        }
        let tag = match self.cursor.current() {
            b'\n' => self.single(RawTag::Newline),
            b'\r' => self.carriage_return(),
            b' ' | b'\t' | 0x01..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F => {
                self.cursor.eat_while(is_blank);
                RawTag::Whitespace
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.cursor.eat_while(is_ident_continue);
                RawTag::Ident
            }
            b'0'..=b'9' => self.number(),
            b'"' => self.quoted(b'"', RawTag::String, RawTag::UnterminatedString),
            b'\'' => self.quoted(b'\'', RawTag::Char, RawTag::UnterminatedChar),
            b'`' => self.backtick(),
            b'/' => self.slash(),
            b'(' => self.single(RawTag::OpenParen),
            b')' => self.single(RawTag::CloseParen),
            b'{' => self.single(RawTag::OpenBrace),
            b'}' => self.single(RawTag::CloseBrace),
            b'[' => self.single(RawTag::OpenBracket),
            b']' => self.single(RawTag::CloseBracket),
            b',' => self.single(RawTag::Comma),
            b':' => self.single(RawTag::Colon),
            b';' => self.single(RawTag::Semicolon),
            b'?' => self.single(RawTag::Question),
            b'.' => self.pair(RawTag::Dot, &[(b'.', RawTag::DotDot)]),
            b'=' => self.pair(RawTag::Equal, &[(b'=', RawTag::EqualEqual)]),
            b'!' => self.pair(RawTag::Bang, &[(b'=', RawTag::BangEqual)]),
            b'+' => self.pair(
                RawTag::Plus,
                &[(b'+', RawTag::PlusPlus), (b'=', RawTag::PlusEqual)],
            ),
            b'-' => self.pair(
                RawTag::Minus,
                &[(b'-', RawTag::MinusMinus), (b'=', RawTag::MinusEqual)],
            ),
            b'*' => self.pair(RawTag::Star, &[(b'=', RawTag::StarEqual)]),
            b'<' => self.pair(RawTag::Less, &[(b'=', RawTag::LessEqual)]),
            b'>' => self.pair(RawTag::Greater, &[(b'=', RawTag::GreaterEqual)]),
            b'&' => self.pair(RawTag::Ampersand, &[(b'&', RawTag::AmpersandAmpersand)]),
            b'|' => self.pair(RawTag::Pipe, &[(b'|', RawTag::PipePipe)]),
            _ => {
                self.cursor.advance_char();
                RawTag::Unknown
            }
        };
        RawToken {
            tag,
            len: self.cursor.pos() - start,
        }
    }

    fn single(&mut self, tag: RawTag) -> RawTag {
        self.cursor.advance();
        tag
    }

    /// One-byte token, or a two-byte one when the next byte matches.
    fn pair(&mut self, single: RawTag, doubles: &[(u8, RawTag)]) -> RawTag {
        self.cursor.advance();
        let next = self.cursor.current();
        for &(byte, tag) in doubles {
            if next == byte {
                self.cursor.advance();
                return tag;
            }
        }
        single
    }

    fn carriage_return(&mut self) -> RawTag {
        self.cursor.advance();
        if self.cursor.current() == b'\n' {
            self.cursor.advance();
            RawTag::Newline
        } else {
            self.cursor.eat_while(is_blank);
            RawTag::Whitespace
        }
    }

    fn slash(&mut self) -> RawTag {
        self.cursor.advance();
        match self.cursor.current() {
            b'/' => {
                self.cursor.eat_until_newline_or_eof();
                RawTag::LineComment
            }
            b'*' => {
                self.cursor.advance();
                if self.cursor.eat_block_comment_body() {
                    RawTag::BlockComment
                } else {
                    RawTag::UnterminatedBlockComment
                }
            }
            b'=' => {
                self.cursor.advance();
                RawTag::SlashEqual
            }
            _ => RawTag::Slash,
        }
    }

    /// Digits and `_`, then `.digits` groups, then an optional `f`.
    ///
    /// A `.` belongs to the number only when a digit follows, so `1..2`
    /// scans as `1`, `..`, `2` and `a.0.b` member chains stay intact.
    fn number(&mut self) -> RawTag {
        self.cursor.eat_while(is_digit_or_separator);
        let mut tag = RawTag::Number;
        let mut fractions = 0;
        while self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(is_digit_or_separator);
            fractions += 1;
            if fractions > 1 {
                tag = RawTag::NumberWithExtraDot;
            }
        }
        if self.cursor.current() == b'f' {
            self.cursor.advance();
        }
        tag
    }

    /// String or char body. Ends at the closing quote; a line break or
    /// EOF first leaves the literal unterminated with the break unconsumed.
    fn quoted(&mut self, quote: u8, closed: RawTag, open: RawTag) -> RawTag {
        self.cursor.advance();
        loop {
            match self.cursor.skip_to_quote_delim(quote) {
                b'\\' => {
                    self.cursor.advance();
                    match self.cursor.current() {
                        b'\n' | b'\r' => return open,
                        _ if self.cursor.is_eof() => return open,
                        _ => self.cursor.advance_char(),
                    }
                }
                b'\n' | b'\r' => return open,
                byte if byte == quote => {
                    self.cursor.advance();
                    return closed;
                }
                _ => return open,
            }
        }
    }

    fn backtick(&mut self) -> RawTag {
        self.cursor.advance();
        if self.cursor.skip_to_backtick_delim() == b'`' {
            self.cursor.advance();
            RawTag::Backtick
        } else {
            RawTag::UnterminatedBacktick
        }
    }
}

#[inline]
fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | 0x01..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F)
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn is_digit_or_separator(b: u8) -> bool {
    b.is_ascii_digit() || b == b'_'
}

#[cfg(test)]
mod tests;
