//! Source location spans.

use std::fmt;

/// Byte range `start..end` of a token in its unit's source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// From a lexer byte range, saturating at `u32::MAX`.
    #[inline]
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        Span { start, end }
    }

    /// Zero-width span at `offset`, used for tokens spliced in by the compiler.
    #[inline]
    pub const fn point(offset: u32) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lexer_ranges_become_spans() {
        assert_eq!(Span::from_range(4..9), Span::new(4, 9));
        assert_eq!(Span::from_range(0..usize::MAX).end, u32::MAX);
    }

    #[test]
    fn spliced_tokens_are_zero_width() {
        let span = Span::point(12);
        assert_eq!((span.start, span.end), (12, 12));
        assert_eq!(format!("{span:?}"), "12..12");
    }
}
