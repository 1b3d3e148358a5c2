//! Error handling for indexing and editing documents
use crate::Segment;

/// A result type for document operations, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// An error that occurred while indexing or editing a document.
#[derive(Debug)]
pub struct XmlError {
    /// Where in the source the error occurred, if it relates to a position in the buffer
    pub context: Option<Box<ErrorContext>>,

    /// The kind of error that occurred
    pub kind: XmlErrorKind,
}
impl XmlError {
    /// Creates a new `XmlError` with no source context
    #[must_use]
    pub fn new(kind: XmlErrorKind) -> Self {
        Self {
            context: None,
            kind,
        }
    }

    /// Creates a new `XmlError` pointing at a span of the given source
    #[must_use]
    pub fn at(source: &str, span: Segment, kind: XmlErrorKind) -> Self {
        Self {
            context: Some(Box::new(ErrorContext::new(source, span))),
            kind,
        }
    }

    /// Returns the kind of error
    #[must_use]
    pub fn kind(&self) -> &XmlErrorKind {
        &self.kind
    }

    /// True if the error was caused by source bytes that could not be indexed
    #[must_use]
    pub fn is_malformed_source(&self) -> bool {
        matches!(
            self.kind,
            XmlErrorKind::MalformedSource(_)
                | XmlErrorKind::UnclosedTag(_)
                | XmlErrorKind::Xml(_)
                | XmlErrorKind::Utf8(_)
        )
    }
}
impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(context) = &self.context else {
            return write!(f, "{}", self.kind);
        };

        write!(f, "{context}")?;
        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            XmlErrorKind::Xml(e) => Some(e),
            XmlErrorKind::Utf8(e) => Some(e),
            _ => None,
        }
    }
}
impl From<XmlErrorKind> for XmlError {
    fn from(kind: XmlErrorKind) -> Self {
        Self::new(kind)
    }
}
impl From<xmlparser::Error> for XmlError {
    fn from(err: xmlparser::Error) -> Self {
        Self::new(XmlErrorKind::Xml(err))
    }
}
impl From<std::str::Utf8Error> for XmlError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::new(XmlErrorKind::Utf8(err))
    }
}

/// The kind of error that occurred while indexing or editing a document.
#[derive(Debug, thiserror::Error)]
pub enum XmlErrorKind {
    /// A single-result query or navigation found more than one candidate
    #[error("More than one node matched `{0}`")]
    AmbiguousMatch(String),

    /// A query that must select something selected nothing
    #[error("No node matched `{0}`")]
    NoMatch(String),

    /// Structural edit attempted on the document root
    #[error("Operation not permitted on the root element")]
    NotPermittedOnRoot,

    /// Child content requested on a self-closing element
    #[error("Operation not permitted on void element <{0}/>")]
    VoidElementOperation(String),

    /// A prefixed name was used before its namespace was declared
    #[error("Namespace prefix `{0}` is not registered")]
    UnresolvedNamespacePrefix(String),

    /// The source could not be indexed into a balanced tree
    #[error("Malformed source: {0}")]
    MalformedSource(String),

    /// A tag in the document was not closed properly
    #[error("Unclosed tag: {0}")]
    UnclosedTag(String),

    /// The tokenizer rejected the source
    #[error("XML parser error: {0}")]
    Xml(#[from] xmlparser::Error),

    /// The source is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A blank or otherwise unusable identifier
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The handle refers to a node that has been removed from the document
    #[error("Node has been removed from the document")]
    DetachedNode,

    /// The path expression could not be understood
    #[error("Invalid path expression: {0}")]
    InvalidPathExpression(String),
}

/// Context describing the error location in the source.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The source line containing the start of the span
    pub line: String,

    /// Position of the error in the source
    pub span: Segment,

    /// 1-based row and column of the span start
    pub position: (usize, usize),
}
impl ErrorContext {
    /// Creates a new `ErrorContext` for the given source and span.
    #[must_use]
    pub fn new(source: &str, span: Segment) -> Self {
        let start = span.start().min(source.len());
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[start..]
            .find('\n')
            .map_or(source.len(), |i| start + i);

        Self {
            line: source[line_start..line_end].to_string(),
            span,
            position: span.position(source),
        }
    }
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (row, col) = self.position;

        if !self.line.is_empty() {
            writeln!(f, "| {}", self.line)?;
        }
        writeln!(f, "= At {row}:{col}")
    }
}

/// Return early with an error pointing at a span of the source.
///
/// `bail!(src, span, kind)` or `bail!(src, span, msg = "format {}", args)`
macro_rules! bail {
    ($src:expr, $span:expr, msg = $($arg:tt)+) => {
        return Err($crate::error::XmlError::at(
            $src,
            $span,
            $crate::error::XmlErrorKind::MalformedSource(format!($($arg)+)),
        ))
    };

    ($src:expr, $span:expr, $kind:expr) => {
        return Err($crate::error::XmlError::at($src, $span, $kind))
    };
}
pub(crate) use bail;
