use super::{Attribute, Content, ElementId, ElementNode, NodeName, TextRun};
use crate::{
    Document, Segment,
    error::{XmlErrorKind, XmlResult},
};

/// Read-only view of an element of a document: `<name attr="value">...</name>`
///
/// Views borrow the document, so they cannot be held across an edit; hold the
/// [`ElementId`] (see [`Element::id`]) instead and look it up again.
#[derive(Clone, Copy)]
pub struct Element<'doc> {
    doc: &'doc Document,
    id: ElementId,
    node: &'doc ElementNode,
}
impl<'doc> Element<'doc> {
    pub(crate) fn new(doc: &'doc Document, id: ElementId, node: &'doc ElementNode) -> Self {
        Self { doc, id, node }
    }

    fn view(&self, id: ElementId) -> Option<Element<'doc>> {
        self.doc
            .elements
            .get(id.0)
            .map(|node| Element::new(self.doc, id, node))
    }

    /// Returns the handle of this element.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Returns the qualified name of the element.
    #[must_use]
    pub fn name(&self) -> &'doc NodeName {
        &self.node.name
    }

    /// Returns the local portion of the element name.
    #[must_use]
    pub fn local_name(&self) -> &'doc str {
        self.node.name.local()
    }

    /// Returns the prefix of the element name.
    #[must_use]
    pub fn prefix(&self) -> Option<&'doc str> {
        self.node.name.prefix()
    }

    /// Returns the namespace URI the element's prefix (or the default namespace) resolved to.
    #[must_use]
    pub fn namespace_uri(&self) -> Option<&'doc str> {
        self.node.namespace_uri.as_deref()
    }

    /// Returns the decoded text of the element: the concatenation of its text runs.
    ///
    /// Text of child elements is not included.
    #[must_use]
    pub fn text(&self) -> String {
        self.node.text()
    }

    /// Returns the text runs of the element, in buffer order.
    pub fn text_runs(&self) -> impl Iterator<Item = &'doc TextRun> + 'doc {
        self.node.text_runs()
    }

    /// Returns the full content of the element, in buffer order.
    #[must_use]
    pub fn content(&self) -> &'doc [Content] {
        &self.node.content
    }

    /// Returns the span of the open tag: `<name ...>` or `<name .../>`.
    #[must_use]
    pub fn open_segment(&self) -> Segment {
        self.node.open
    }

    /// Returns the span of the close tag; equal to the open segment for void elements.
    #[must_use]
    pub fn close_segment(&self) -> Segment {
        self.node.close
    }

    /// Returns the span of the whole element, open tag through close tag.
    #[must_use]
    pub fn span(&self) -> Segment {
        self.node.span()
    }

    /// Returns the source bytes of the whole element.
    #[must_use]
    pub fn source(&self) -> &'doc str {
        self.span().text(self.doc.as_str())
    }

    /// True if the element has no distinct close tag: `<name/>`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.node.is_void()
    }

    /// False for the document root only.
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.node.parent.is_some()
    }

    /// Returns the parent element, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Element<'doc>> {
        self.node.parent.and_then(|p| self.view(p))
    }

    /// Number of elements between this one and the root; the root is at depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.doc.depth(self.id)
    }

    /// Returns the child elements, in buffer order.
    pub fn children(&self) -> impl Iterator<Item = Element<'doc>> + 'doc {
        let doc = self.doc;
        self.node.children().filter_map(move |id| {
            doc.elements
                .get(id.0)
                .map(|node| Element::new(doc, id, node))
        })
    }

    /// Returns the child elements with the given qualified name.
    #[must_use]
    pub fn children_named(&self, name: &str) -> Vec<Element<'doc>> {
        self.children().filter(|c| c.name() == name).collect()
    }

    /// True if the element has at least one child element.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.node.children().next().is_some()
    }

    /// True if a child element with the given name exists.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.children().any(|c| c.name() == name)
    }

    /// True if exactly one child element with the given name exists.
    #[must_use]
    pub fn has_single_child(&self, name: &str) -> bool {
        self.children().filter(|c| c.name() == name).count() == 1
    }

    /// Returns the only child element with the given name.
    ///
    /// # Errors
    /// - [`XmlErrorKind::AmbiguousMatch`] if more than one child has the name
    /// - [`XmlErrorKind::InvalidArgument`] if the name is blank
    pub fn get_single_child(&self, name: &str) -> XmlResult<Option<Element<'doc>>> {
        check_name(name)?;
        single(self.children().filter(|c| c.name() == name), name)
    }

    /// Returns the first child element, skipping text and comments.
    #[must_use]
    pub fn first_child(&self) -> Option<Element<'doc>> {
        self.children().next()
    }

    /// Returns the last child element, skipping text and comments.
    #[must_use]
    pub fn last_child(&self) -> Option<Element<'doc>> {
        self.node.children().last().and_then(|id| self.view(id))
    }

    /// Returns the sibling elements, excluding this one. Empty for the root.
    #[must_use]
    pub fn siblings(&self) -> Vec<Element<'doc>> {
        let Some(parent) = self.parent() else {
            return vec![];
        };
        parent.children().filter(|s| s.id != self.id).collect()
    }

    /// True if a sibling element (other than this one) has the given name.
    #[must_use]
    pub fn has_sibling(&self, name: &str) -> bool {
        self.siblings().iter().any(|s| s.name() == name)
    }

    /// Returns the only sibling element with the given name.
    ///
    /// # Errors
    /// - [`XmlErrorKind::AmbiguousMatch`] if more than one sibling has the name
    /// - [`XmlErrorKind::InvalidArgument`] if the name is blank
    pub fn get_single_sibling(&self, name: &str) -> XmlResult<Option<Element<'doc>>> {
        check_name(name)?;
        single(self.siblings().into_iter().filter(|s| s.name() == name), name)
    }

    /// Returns the closest preceding sibling element, skipping text and comments.
    #[must_use]
    pub fn previous_sibling(&self) -> Option<Element<'doc>> {
        let parent = self.parent()?;
        let index = parent.node.position_of(self.id)?;
        parent.node.content[..index]
            .iter()
            .rev()
            .find_map(Content::as_element)
            .and_then(|id| self.view(id))
    }

    /// Returns the closest following sibling element, skipping text and comments.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Element<'doc>> {
        let parent = self.parent()?;
        let index = parent.node.position_of(self.id)?;
        parent.node.content[index + 1..]
            .iter()
            .find_map(Content::as_element)
            .and_then(|id| self.view(id))
    }

    /// Returns the text of the only child with the given name.
    ///
    /// `None` if the child does not exist, or is not the only child with that name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<String> {
        match self.get_single_child(name) {
            Ok(Some(child)) => Some(child.text()),
            _ => None,
        }
    }

    /// Returns the text of the only child with the given name, or `default`.
    #[must_use]
    pub fn child_text_or(&self, name: &str, default: &str) -> String {
        self.child_text(name).unwrap_or_else(|| default.to_string())
    }

    /// Returns the attributes of the element, in buffer order.
    pub fn attributes(&self) -> impl Iterator<Item = Attribute<'doc>> + 'doc {
        let doc = self.doc;
        self.node.attributes.iter().filter_map(move |&id| {
            doc.attributes
                .get(id.0)
                .map(|node| Attribute::new(doc, id, node))
        })
    }

    /// Returns the attribute with the given qualified name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Attribute<'doc>> {
        self.attributes().find(|a| a.name() == name)
    }

    /// Returns the value of the attribute with the given qualified name.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> Option<&'doc str> {
        self.attribute(name).map(|a| a.value())
    }

    /// True if the element has an attribute with the given qualified name.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}
impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("name", &self.node.name.to_string())
            .field("open", &self.node.open)
            .field("close", &self.node.close)
            .finish()
    }
}
impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

pub(crate) fn check_name(name: &str) -> XmlResult<()> {
    if name.trim().is_empty() {
        return Err(XmlErrorKind::InvalidArgument("name must not be blank".to_string()).into());
    }
    Ok(())
}

/// At most one item, or an ambiguity error naming `what`.
pub(crate) fn single<T>(mut items: impl Iterator<Item = T>, what: &str) -> XmlResult<Option<T>> {
    let first = items.next();
    if first.is_some() && items.next().is_some() {
        return Err(XmlErrorKind::AmbiguousMatch(what.to_string()).into());
    }
    Ok(first)
}
