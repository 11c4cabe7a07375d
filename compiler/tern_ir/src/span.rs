//! Byte spans and source positions.
//!
//! A [`Span`] is a half-open byte range inside one source text. A [`Pos`]
//! pairs it with the [`SourceId`] it points into, so diagnostics coming from
//! a merged compilation unit can still name their file.

use std::fmt;

/// Half-open byte range `start..end`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Placeholder for synthesized nodes.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Length in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Index of a [`Source`](crate::Source) inside a [`SourceMap`](crate::SourceMap).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// A span tied to the source it was taken from.
///
/// Positions are never dereferenced without the owning `SourceMap`; they
/// carry no borrow of the text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Pos {
    pub source: SourceId,
    pub span: Span,
}

impl Pos {
    #[inline]
    pub const fn new(source: SourceId, span: Span) -> Self {
        Pos { source, span }
    }

    /// Cover `self` through `other`. Both must come from the same source;
    /// otherwise `self` is kept unchanged.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Pos) -> Pos {
        if self.source != other.source {
            return self;
        }
        Pos {
            source: self.source,
            span: self.span.merge(other.span),
        }
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{:?}", self.source.0, self.span)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Pos, Span};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(Pos, 12);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(15));
        assert!(!span.contains(20));
        assert_eq!(span.to_range(), 10..20);
    }

    #[test]
    fn test_span_merge_is_order_independent() {
        let a = Span::new(10, 20);
        let b = Span::new(15, 30);
        assert_eq!(a.merge(b), Span::new(10, 30));
        assert_eq!(b.merge(a), Span::new(10, 30));
    }

    #[test]
    fn test_pos_merge_ignores_foreign_source() {
        let a = Pos::new(SourceId(0), Span::new(0, 3));
        let b = Pos::new(SourceId(1), Span::new(10, 12));
        assert_eq!(a.merge(b), a);

        let c = Pos::new(SourceId(0), Span::new(5, 9));
        assert_eq!(a.merge(c).span, Span::new(0, 9));
    }

    #[test]
    fn test_span_debug_format() {
        assert_eq!(format!("{:?}", Span::new(4, 5)), "4..5");
        assert_eq!(
            format!("{:?}", Pos::new(SourceId(2), Span::new(4, 5))),
            "#2@4..5"
        );
    }
}
