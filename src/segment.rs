//! Byte ranges anchoring constructs to their location in the source buffer.
use std::ops::Range;

/// A half-open byte range `[start, end)` into the source buffer of a document.
///
/// Segments are plain values: they are never shared between nodes, and are
/// shifted in place whenever an edit happens before them in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    start: usize,
    end: usize,
}
impl Segment {
    /// Create a new segment covering `start..end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "segment start {start} after end {end}");
        Self { start, end }
    }

    /// Create a segment of `len` bytes starting at `start`.
    #[must_use]
    pub fn with_len(start: usize, len: usize) -> Self {
        Self::new(start, start + len)
    }

    /// Returns the start position of the segment in the buffer.
    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the position one past the last byte of the segment.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the length of the segment.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Return true if len == 0
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the segment as a range, for slicing the buffer.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Extend the range of this segment to include the other segment.
    pub fn extend(&mut self, other: &Segment) {
        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);
    }

    /// True if `other` lies entirely within this segment.
    #[must_use]
    pub fn contains(&self, other: &Segment) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if the two segments share at least one byte.
    #[must_use]
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the bytes of this segment as a string slice of the source.
    ///
    /// # Panics
    /// Panics if the segment is out of bounds for `source`, or not on a char boundary.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }

    /// Calculates the row and column of the segment start in the source.
    ///
    /// Warning: This is an expensive operation, and should be used for error reporting only.
    #[must_use]
    pub fn position(&self, source: &str) -> (usize, usize) {
        let mut row = 1;
        let mut col = 1;
        for (i, c) in source.char_indices() {
            if i >= self.start {
                break;
            }
            if c == '\n' {
                row += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (row, col)
    }

    /// Re-anchor this segment after the bytes up to `edit_end` were replaced,
    /// changing the buffer length by `delta`.
    ///
    /// Segments starting at or after `edit_end` move by `delta`. Segments
    /// that start before the edit but end after it enclose the edit, and grow
    /// or shrink by `delta`. Segments ending at or before the edit are untouched.
    pub(crate) fn shift(&mut self, edit_end: usize, delta: isize) {
        if self.start >= edit_end {
            self.start = self.start.saturating_add_signed(delta);
            self.end = self.end.saturating_add_signed(delta);
        } else if self.end > edit_end {
            self.end = self.end.saturating_add_signed(delta);
        }
    }
}

impl<'a> From<xmlparser::StrSpan<'a>> for Segment {
    #[inline]
    fn from(span: xmlparser::StrSpan<'a>) -> Self {
        Segment::new(span.start(), span.end())
    }
}

impl From<Range<usize>> for Segment {
    #[inline]
    fn from(range: Range<usize>) -> Self {
        Segment::new(range.start, range.end)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
