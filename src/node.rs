//! The node model: elements, attributes, and the content between them.
//!
//! Nodes live in arenas owned by the [`crate::Document`], and are addressed by
//! [`ElementId`] and [`AttributeId`] handles. Read access goes through the
//! [`Element`] and [`Attribute`] views.
use crate::{Segment, arena::Key};

mod name;
pub use name::*;

mod text;
pub use text::*;

mod element;
pub use element::*;

mod attribute;
pub use attribute::*;

/// Handle to an element of a document.
///
/// Handles are cheap to copy and stay valid across edits, until the element
/// itself is removed. Using a handle to a removed element fails with
/// [`crate::XmlErrorKind::DetachedNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) Key);

/// Handle to an attribute of a document. See [`ElementId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub(crate) Key);

/// One item of the content of an element, in buffer order.
///
/// Comments, CDATA sections and processing instructions are opaque: they are
/// kept so that edits can step around them, but are not queryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Character data
    Text(TextRun),

    /// `<!--...-->`
    Comment(Segment),

    /// `<![CDATA[...]]>`
    Cdata(Segment),

    /// `<?target ...?>`
    Instruction(Segment),

    /// A child element
    Element(ElementId),
}
impl Content {
    /// Returns the span of this item, or `None` for child elements (see [`Element::span`]).
    #[must_use]
    pub fn segment(&self) -> Option<Segment> {
        match self {
            Self::Text(run) => Some(run.segment()),
            Self::Comment(s) | Self::Cdata(s) | Self::Instruction(s) => Some(*s),
            Self::Element(_) => None,
        }
    }

    /// Returns the child element handle, if this is a child element.
    #[must_use]
    pub fn as_element(&self) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the text run, if this is character data.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Self::Text(run) => Some(run),
            _ => None,
        }
    }

    pub(crate) fn segment_mut(&mut self) -> Option<&mut Segment> {
        match self {
            Self::Text(run) => Some(run.segment_mut()),
            Self::Comment(s) | Self::Cdata(s) | Self::Instruction(s) => Some(s),
            Self::Element(_) => None,
        }
    }
}

/// Arena record of an element.
#[derive(Debug, Clone)]
pub(crate) struct ElementNode {
    pub name: NodeName,
    pub namespace_uri: Option<String>,

    /// `<name ...>` or `<name .../>`
    pub open: Segment,

    /// `</name>`, or equal to `open` for void elements
    pub close: Segment,

    pub attributes: Vec<AttributeId>,
    pub content: Vec<Content>,
    pub parent: Option<ElementId>,
}
impl ElementNode {
    pub fn new(name: NodeName, open: Segment, parent: Option<ElementId>) -> Self {
        Self {
            name,
            namespace_uri: None,
            open,
            close: open,
            attributes: vec![],
            content: vec![],
            parent,
        }
    }

    pub fn is_void(&self) -> bool {
        self.open == self.close
    }

    /// The whole element, open tag through close tag.
    pub fn span(&self) -> Segment {
        Segment::new(self.open.start(), self.close.end())
    }

    pub fn children(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.content.iter().filter_map(Content::as_element)
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> + '_ {
        self.content.iter().filter_map(Content::as_text)
    }

    /// Concatenation of all text runs.
    pub fn text(&self) -> String {
        self.text_runs().map(TextRun::content).collect()
    }

    /// Index of a child element in `content`.
    pub fn position_of(&self, child: ElementId) -> Option<usize> {
        self.content
            .iter()
            .position(|c| c.as_element() == Some(child))
    }

    /// Every segment owned by this record, for re-anchoring.
    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut Segment> + '_ {
        [&mut self.open, &mut self.close]
            .into_iter()
            .chain(self.content.iter_mut().filter_map(Content::segment_mut))
    }
}

/// Arena record of an attribute.
#[derive(Debug, Clone)]
pub(crate) struct AttributeNode {
    pub owner: ElementId,
    pub name: NodeName,
    pub namespace_uri: Option<String>,

    /// Decoded value
    pub value: String,

    /// `name="value"`
    pub segment: Segment,

    /// The bytes between the quotes
    pub value_segment: Segment,
}
impl AttributeNode {
    /// If this attribute declares a namespace, the prefix it declares (`""` for the default namespace).
    pub fn declared_prefix(&self) -> Option<&str> {
        match self.name.prefix() {
            Some(crate::namespace::XMLNS_PREFIX) => Some(self.name.local()),
            None if self.name.local() == crate::namespace::XMLNS_PREFIX => Some(""),
            _ => None,
        }
    }

    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut Segment> + '_ {
        [&mut self.segment, &mut self.value_segment].into_iter()
    }
}
