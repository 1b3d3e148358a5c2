use crate::{
    Segment,
    arena::Arena,
    error::{XmlErrorKind, XmlResult},
    indexer::{Index, index_document},
    namespace::NamespaceRegistry,
    node::{Attribute, AttributeId, AttributeNode, Content, Element, ElementId, ElementNode, NodeName},
    options::TreeOptions,
    path::LocationPathEvaluator,
    query::PathEvaluator,
    to_xml::decode_entities,
};

/// An XML document held as its source bytes, with an index of where every node lives in them.
///
/// Edits splice the buffer directly, so everything outside the edited region
/// is reproduced byte for byte: whitespace, comments, attribute quoting and
/// order, entity references, the declaration and DTD.
///
/// The document contains:
/// - The source buffer, always valid UTF-8
/// - The element and attribute arenas, addressed by [`ElementId`] and [`AttributeId`]
/// - The namespace registry
/// - The options used to format inserted content
/// - The path evaluator used by queries
///
/// Other things to note:
/// - The declaration, DTD, and anything before or after the root element stay in the buffer but are not modelled
/// - Text runs that are only whitespace are kept as content, so edits can step around them
/// - Namespace declarations are document-scoped; see [`NamespaceRegistry`]
///
/// ```
/// use xmledit::{Document, NewElement};
///
/// let mut doc: Document = "<deps>\n    <dep>a</dep>\n</deps>".parse()?;
/// let root = doc.root().id();
/// doc.append_child(root, &NewElement::with_text("dep", "b"))?;
/// assert_eq!(doc.to_string(), "<deps>\n    <dep>a</dep>\n    <dep>b</dep>\n</deps>");
/// # Ok::<(), xmledit::XmlError>(())
/// ```
pub struct Document {
    pub(crate) buffer: String,
    pub(crate) elements: Arena<ElementNode>,
    pub(crate) attributes: Arena<AttributeNode>,
    pub(crate) root: ElementId,
    pub(crate) namespaces: NamespaceRegistry,
    pub(crate) options: TreeOptions,
    pub(crate) evaluator: Box<dyn PathEvaluator>,
}
impl Document {
    /// Index a document from its bytes.
    ///
    /// # Errors
    /// Fails with an error where [`crate::XmlError::is_malformed_source`] is true if
    /// the bytes are not UTF-8, or not a well-formed document with a single root element.
    pub fn from_bytes(bytes: &[u8]) -> XmlResult<Self> {
        let src = std::str::from_utf8(bytes)?;
        Self::parse_str(src)
    }

    /// Index a document from a string.
    ///
    /// # Errors
    /// See [`Document::from_bytes`].
    pub fn parse_str(src: &str) -> XmlResult<Self> {
        let Index {
            elements,
            attributes,
            namespaces,
            root,
        } = index_document(src)?;

        log::debug!(
            "indexed {} bytes: {} elements, {} attributes",
            src.len(),
            elements.len(),
            attributes.len()
        );

        Ok(Self {
            buffer: src.to_string(),
            elements,
            attributes,
            root,
            namespaces,
            options: TreeOptions::default(),
            evaluator: Box::new(LocationPathEvaluator),
        })
    }

    /// Create a document holding a declaration and an empty root element:
    ///
    /// ```xml
    /// <?xml version="1.0" encoding="UTF-8"?>
    /// <root_name/>
    /// ```
    ///
    /// The root is void, so add attributes to it, or replace its text, rather than appending children.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::InvalidArgument`] if the name is not a valid qualified name.
    pub fn create_empty(root_name: &str) -> XmlResult<Self> {
        let name = NodeName::parse(root_name)?;
        Self::parse_str(&format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<{name}/>"))
    }

    /// Replace the options used to format inserted content.
    #[must_use]
    pub fn with_options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the evaluator used by path queries.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: impl PathEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Returns the options used to format inserted content.
    #[must_use]
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Returns a copy of the current bytes of the document.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.as_bytes().to_vec()
    }

    /// Returns the current bytes of the document.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Returns the current source of the document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consumes the document, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> Element<'_> {
        let node = self
            .elements
            .get(self.root.0)
            .expect("Bug; the root element is never removed");
        Element::new(self, self.root, node)
    }

    /// Returns the element with the given handle.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::DetachedNode`] if the element was removed.
    pub fn element(&self, id: ElementId) -> XmlResult<Element<'_>> {
        Ok(Element::new(self, id, self.node(id)?))
    }

    /// Returns the attribute with the given handle.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::DetachedNode`] if the attribute was removed.
    pub fn attribute(&self, id: AttributeId) -> XmlResult<Attribute<'_>> {
        Ok(Attribute::new(self, id, self.attr_node(id)?))
    }

    /// True if the element has not been removed.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(id.0)
    }

    /// Returns the namespace registry.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Number of elements in the document.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check that every segment still covers the construct it represents.
    ///
    /// Open tags start with `<name` and end with `>`, close tags read `</name>`,
    /// attribute and text bytes decode to the stored values, and sibling
    /// content does not overlap.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::MalformedSource`] describing the first inconsistency found.
    pub fn verify_segments(&self) -> XmlResult<()> {
        let fail = |msg: String| -> XmlResult<()> { Err(XmlErrorKind::MalformedSource(msg).into()) };

        for node in self.elements.values() {
            let open = self.slice(node.open)?;
            if !open.starts_with(&format!("<{}", node.name)) || !open.ends_with('>') {
                return fail(format!("open tag of <{}> is {}: `{open}`", node.name, node.open));
            }

            if !node.is_void() && self.slice(node.close)? != format!("</{}>", node.name) {
                return fail(format!("close tag of <{}> is {}", node.name, node.close));
            }

            let mut last_end = node.open.end();
            for item in &node.content {
                let segment = match item {
                    Content::Element(id) => self.node(*id)?.span(),
                    other => other.segment().unwrap_or_default(),
                };
                if segment.start() < last_end || !node.span().contains(&segment) {
                    return fail(format!("content of <{}> at {segment} is out of order", node.name));
                }
                last_end = segment.end();

                if let Content::Text(run) = item {
                    let decoded = decode_entities(self.slice(run.segment())?).map_err(XmlErrorKind::MalformedSource)?;
                    if decoded != run.content() {
                        return fail(format!("text run at {segment} of <{}> is stale", node.name));
                    }
                }
            }

            for id in &node.attributes {
                let attr = self.attr_node(*id)?;
                let source = self.slice(attr.segment)?;
                let value = decode_entities(self.slice(attr.value_segment)?).map_err(XmlErrorKind::MalformedSource)?;
                if !source.starts_with(&attr.name.to_string())
                    || !node.open.contains(&attr.segment)
                    || !attr.segment.contains(&attr.value_segment)
                    || value != attr.value
                {
                    return fail(format!("attribute `{}` at {} is stale: `{source}`", attr.name, attr.segment));
                }
            }
        }

        self.slice(self.root().span())?;
        Ok(())
    }

    fn slice(&self, segment: Segment) -> XmlResult<&str> {
        self.buffer
            .get(segment.range())
            .ok_or_else(|| XmlErrorKind::MalformedSource(format!("segment {segment} is outside the buffer")).into())
    }

    pub(crate) fn node(&self, id: ElementId) -> XmlResult<&ElementNode> {
        self.elements
            .get(id.0)
            .ok_or_else(|| XmlErrorKind::DetachedNode.into())
    }

    pub(crate) fn node_mut(&mut self, id: ElementId) -> XmlResult<&mut ElementNode> {
        self.elements
            .get_mut(id.0)
            .ok_or_else(|| XmlErrorKind::DetachedNode.into())
    }

    pub(crate) fn attr_node(&self, id: AttributeId) -> XmlResult<&AttributeNode> {
        self.attributes
            .get(id.0)
            .ok_or_else(|| XmlErrorKind::DetachedNode.into())
    }

    pub(crate) fn attr_node_mut(&mut self, id: AttributeId) -> XmlResult<&mut AttributeNode> {
        self.attributes
            .get_mut(id.0)
            .ok_or_else(|| XmlErrorKind::DetachedNode.into())
    }

    /// Number of ancestors of an element; the root is at depth 0.
    pub(crate) fn depth(&self, id: ElementId) -> usize {
        let mut depth = 0;
        let mut current = self.elements.get(id.0).and_then(|n| n.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.elements.get(parent.0).and_then(|n| n.parent);
        }
        depth
    }
}

impl std::str::FromStr for Document {
    type Err = crate::XmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.buffer)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.buffer.len())
            .field("elements", &self.elements.len())
            .field("attributes", &self.attributes.len())
            .field("root", &self.root)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
