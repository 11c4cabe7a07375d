//! Source texts and the map that owns them for one compilation.

use crate::{Pos, SourceId, Span};

/// An immutable `(name, text)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    name: String,
    text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text length as a span offset.
    ///
    /// Sources longer than `u32::MAX` bytes are clamped; spans cannot
    /// address past that point anyway.
    pub fn len(&self) -> u32 {
        u32::try_from(self.text.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text addressed by `span`, or `None` if it is out of bounds or
    /// does not fall on character boundaries.
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.to_range())
    }
}

/// Every source of a compilation unit, indexed by [`SourceId`].
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    sources: Vec<Source>,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap::default()
    }

    /// Register a source and return its id.
    pub fn add(&mut self, source: Source) -> SourceId {
        let id = SourceId(u32::try_from(self.sources.len()).unwrap_or(u32::MAX));
        self.sources.push(source);
        id
    }

    pub fn get(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(id.0 as usize)
    }

    /// Text at `pos`, if the position is valid for this map.
    pub fn snippet(&self, pos: Pos) -> Option<&str> {
        self.get(pos.source)?.slice(pos.span)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &Source)> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, s)| (SourceId(u32::try_from(i).unwrap_or(u32::MAX)), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_map_ids_are_sequential() {
        let mut map = SourceMap::new();
        let a = map.add(Source::new("a.tn", "fn main() {}"));
        let b = map.add(Source::new("b.tn", "var x = 1"));
        assert_eq!(a, SourceId(0));
        assert_eq!(b, SourceId(1));
        assert_eq!(map.get(b).map(Source::name), Some("b.tn"));
        assert_eq!(map.iter().count(), 2);
    }

    #[test]
    fn test_snippet_checks_bounds() {
        let mut map = SourceMap::new();
        let id = map.add(Source::new("a.tn", "var x"));
        assert_eq!(map.snippet(Pos::new(id, Span::new(4, 5))), Some("x"));
        assert_eq!(map.snippet(Pos::new(id, Span::new(4, 9))), None);
        assert_eq!(map.snippet(Pos::new(SourceId(7), Span::new(0, 1))), None);
    }
}
