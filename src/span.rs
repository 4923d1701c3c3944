// Byte ranges in the root input stream

use std::fmt;

/// A half-open byte range `[start, end)` in the root input stream.
///
/// Spans are always root-relative: offsets of values parsed out of nested
/// sub-streams are composed with the enclosing field's start before a span
/// is built. A value with no recorded position has no span at all rather
/// than a zero-length one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of bytes covered
    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    /// Whether `offset` falls inside the range
    pub fn contains(&self, offset: u64) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether `other` lies entirely inside this range
    pub fn encloses(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
