use super::{AttributeId, AttributeNode, Element, NodeName};
use crate::{Document, Segment};

/// Read-only view of an attribute set on an element: `name="value"`
#[derive(Clone, Copy)]
pub struct Attribute<'doc> {
    doc: &'doc Document,
    id: AttributeId,
    node: &'doc AttributeNode,
}
impl<'doc> Attribute<'doc> {
    pub(crate) fn new(doc: &'doc Document, id: AttributeId, node: &'doc AttributeNode) -> Self {
        Self { doc, id, node }
    }

    /// Returns the handle of this attribute.
    #[must_use]
    pub fn id(&self) -> AttributeId {
        self.id
    }

    /// Returns the qualified name of the attribute.
    #[must_use]
    pub fn name(&self) -> &'doc NodeName {
        &self.node.name
    }

    /// Returns the local portion of the attribute name.
    #[must_use]
    pub fn local_name(&self) -> &'doc str {
        self.node.name.local()
    }

    /// Returns the prefix of the attribute name.
    #[must_use]
    pub fn prefix(&self) -> Option<&'doc str> {
        self.node.name.prefix()
    }

    /// Returns the namespace URI of a prefixed attribute.
    #[must_use]
    pub fn namespace_uri(&self) -> Option<&'doc str> {
        self.node.namespace_uri.as_deref()
    }

    /// Returns the decoded value of the attribute.
    #[must_use]
    pub fn value(&self) -> &'doc str {
        &self.node.value
    }

    /// Returns the element the attribute is set on.
    #[must_use]
    pub fn owner(&self) -> Option<Element<'doc>> {
        self.doc.element(self.node.owner).ok()
    }

    /// Returns the span of `name="value"` in the buffer.
    #[must_use]
    pub fn segment(&self) -> Segment {
        self.node.segment
    }

    /// Returns the span of the raw value, between the quotes.
    #[must_use]
    pub fn value_segment(&self) -> Segment {
        self.node.value_segment
    }

    /// Returns the source bytes of `name="value"`.
    #[must_use]
    pub fn source(&self) -> &'doc str {
        self.node.segment.text(self.doc.as_str())
    }
}
impl std::fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("id", &self.id)
            .field("name", &self.node.name.to_string())
            .field("value", &self.node.value)
            .field("segment", &self.node.segment)
            .finish()
    }
}
