use crate::Segment;

/// A run of character data between two markup boundaries inside an element.
///
/// The segment covers the raw bytes (entity references included); the content
/// is the decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    segment: Segment,
    content: String,
}
impl TextRun {
    pub(crate) fn new(segment: Segment, content: impl Into<String>) -> Self {
        Self {
            segment,
            content: content.into(),
        }
    }

    /// Returns the span of the run in the buffer.
    #[must_use]
    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// Returns the decoded text of the run.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True if the run holds nothing but whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub(crate) fn segment_mut(&mut self) -> &mut Segment {
        &mut self.segment
    }
}
