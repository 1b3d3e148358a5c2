//! Indexing of source bytes into the node arenas.
//!
//! A single pass over the `xmlparser` token stream records, for every element,
//! attribute and piece of content, the exact byte range it occupies. The same
//! pass indexes fragments spliced into an existing buffer by the mutation
//! operations, so new nodes get exact segments too.
use crate::{
    Segment,
    arena::Arena,
    error::{XmlError, XmlErrorKind, XmlResult, bail},
    namespace::NamespaceRegistry,
    node::{AttributeId, AttributeNode, Content, ElementId, ElementNode, NodeName, TextRun},
    to_xml::decode_entities,
};
use std::ops::Range;
use xmlparser::{ElementEnd, Token, Tokenizer};

/// The product of indexing a whole document.
pub(crate) struct Index {
    pub elements: Arena<ElementNode>,
    pub attributes: Arena<AttributeNode>,
    pub namespaces: NamespaceRegistry,
    pub root: ElementId,
}

/// Index a complete document.
pub(crate) fn index_document(src: &str) -> XmlResult<Index> {
    let mut elements = Arena::new();
    let mut attributes = Arena::new();
    let mut namespaces = NamespaceRegistry::new();

    let mut indexer = Indexer::new(src, &mut elements, &mut attributes, &mut namespaces, None);
    indexer.run(Tokenizer::from(src), ParserState::Prolog)?;
    let Some(root) = indexer.root else {
        bail!(
            src,
            Segment::with_len(src.len(), 0),
            msg = "Document has no root element"
        );
    };

    Ok(Index {
        elements,
        attributes,
        namespaces,
        root,
    })
}

/// Index the bytes in `range` of `src` as content of `parent`.
///
/// Returns the top-level content of the fragment, in order, for the caller to
/// place into the parent's content.
pub(crate) fn index_fragment(
    src: &str,
    range: Range<usize>,
    parent: ElementId,
    elements: &mut Arena<ElementNode>,
    attributes: &mut Arena<AttributeNode>,
    namespaces: &mut NamespaceRegistry,
) -> XmlResult<Vec<Content>> {
    let tokenizer = Tokenizer::from_fragment(src, range.clone());
    let mut indexer = Indexer::new(src, elements, attributes, namespaces, Some(parent));
    let result = indexer.run(tokenizer, ParserState::TagChildren);
    let created = std::mem::take(&mut indexer.created);

    match result {
        Ok(top) => {
            log::trace!(
                "indexed fragment {range:?}: {} elements, {} top-level items",
                created.len(),
                top.len()
            );
            Ok(top)
        }

        Err(e) => {
            // Nothing outside the fragment refers to these yet
            for id in created {
                if let Some(node) = elements.remove(id.0) {
                    for attr in node.attributes {
                        attributes.remove(attr.0);
                    }
                }
            }
            Err(e)
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
enum ParserState {
    Prolog,
    TagAttributes,
    TagChildren,
    Epilog,
}

struct Indexer<'a> {
    src: &'a str,
    elements: &'a mut Arena<ElementNode>,
    attributes: &'a mut Arena<AttributeNode>,
    namespaces: &'a mut NamespaceRegistry,

    /// Parent of top-level elements; set when indexing a fragment
    base: Option<ElementId>,
    root: Option<ElementId>,
    stack: Vec<ElementId>,
    created: Vec<ElementId>,
}
impl<'a> Indexer<'a> {
    fn new(
        src: &'a str,
        elements: &'a mut Arena<ElementNode>,
        attributes: &'a mut Arena<AttributeNode>,
        namespaces: &'a mut NamespaceRegistry,
        base: Option<ElementId>,
    ) -> Self {
        Self {
            src,
            elements,
            attributes,
            namespaces,
            base,
            root: None,
            stack: vec![],
            created: vec![],
        }
    }

    fn is_fragment(&self) -> bool {
        self.base.is_some()
    }

    #[expect(clippy::too_many_lines, reason = "State machine")]
    fn run(&mut self, mut tokenizer: Tokenizer<'_>, mut state: ParserState) -> XmlResult<Vec<Content>> {
        let src = self.src;
        let mut top = vec![];

        loop {
            let Some(next) = tokenizer.next() else {
                if let Some(&open) = self.stack.last() {
                    let node = self.node(open)?;
                    bail!(src, node.open, XmlErrorKind::UnclosedTag(node.name.to_string()));
                }

                self.resolve_namespaces();
                return Ok(top);
            };
            let next = match next {
                Ok(token) => token,
                Err(e) => {
                    let span = Segment::with_len(offset_of(src, e.pos()), 0);
                    bail!(src, span, XmlErrorKind::Xml(e));
                }
            };

            match state {
                ParserState::Prolog => match next {
                    Token::ElementStart {
                        prefix,
                        local,
                        span,
                    } => {
                        self.open_element(NodeName::from((prefix, local)), span.into(), &mut top)?;
                        state = ParserState::TagAttributes;
                    }

                    Token::Declaration { .. }
                    | Token::ProcessingInstruction { .. }
                    | Token::Comment { .. }
                    | Token::EmptyDtd { .. }
                    | Token::DtdStart { .. }
                    | Token::EntityDeclaration { .. }
                    | Token::DtdEnd { .. } => {
                        // Kept in the buffer, not modelled
                    }

                    Token::Text { text } if text.as_str().trim().is_empty() => {}

                    _ => {
                        let span = token_span(&next);
                        bail!(src, span, msg = "Unexpected {} before the root element", token_name(&next));
                    }
                },

                ParserState::TagAttributes => match next {
                    Token::Attribute {
                        prefix,
                        local,
                        value,
                        span,
                        ..
                    } => {
                        let name = NodeName::from((prefix, local));
                        self.add_attribute(name, span.into(), value.into())?;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Open,
                        span,
                    } => {
                        let Some(&id) = self.stack.last() else {
                            bail!(src, span.into(), msg = "Bug; Cannot open tag; stack is empty!");
                        };
                        self.node_mut(id)?.open.extend(&span.into());
                        state = ParserState::TagChildren;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Empty,
                        span,
                    } => {
                        let Some(id) = self.stack.pop() else {
                            bail!(src, span.into(), msg = "Bug; Cannot close tag; stack is empty!");
                        };

                        let node = self.node_mut(id)?;
                        node.open.extend(&span.into());
                        node.close = node.open;
                        state = self.after_close();
                    }

                    Token::Text { .. } => {
                        // ignore
                    }

                    _ => {
                        let span = token_span(&next);
                        bail!(src, span, msg = "Unexpected {} in tag attributes", token_name(&next));
                    }
                },

                ParserState::TagChildren => match next {
                    Token::ElementStart {
                        prefix,
                        local,
                        span,
                    } => {
                        self.open_element(NodeName::from((prefix, local)), span.into(), &mut top)?;
                        state = ParserState::TagAttributes;
                    }

                    Token::Text { text } => {
                        let content = decode_entities(text.as_str()).map_err(|e| {
                            XmlError::at(src, text.into(), XmlErrorKind::MalformedSource(e))
                        })?;
                        let run = TextRun::new(text.into(), content);
                        self.push_content(Content::Text(run), &mut top)?;
                    }

                    Token::Cdata { span, .. } => {
                        self.push_content(Content::Cdata(span.into()), &mut top)?;
                    }

                    Token::Comment { span, .. } => {
                        self.push_content(Content::Comment(span.into()), &mut top)?;
                    }

                    Token::ProcessingInstruction { span, .. } => {
                        self.push_content(Content::Instruction(span.into()), &mut top)?;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Close(prefix, local),
                        span,
                    } => {
                        let Some(id) = self.stack.pop() else {
                            bail!(src, span.into(), msg = "Unexpected close tag `</{}>`", NodeName::from((prefix, local)));
                        };

                        let name = NodeName::from((prefix, local));
                        let node = self.node_mut(id)?;
                        if node.name != name {
                            let expected = node.name.to_string();
                            bail!(src, span.into(), XmlErrorKind::UnclosedTag(expected));
                        }

                        node.close = span.into();
                        state = self.after_close();
                    }

                    _ => {
                        let span = token_span(&next);
                        bail!(src, span, msg = "Unexpected {} inside tag", token_name(&next));
                    }
                },

                ParserState::Epilog => match next {
                    Token::Comment { .. } | Token::ProcessingInstruction { .. } => {
                        // Kept in the buffer, not modelled
                    }

                    Token::Text { text } if text.as_str().trim().is_empty() => {}

                    Token::ElementStart { span, .. } => {
                        bail!(src, span.into(), msg = "Document has more than one root element");
                    }

                    _ => {
                        let span = token_span(&next);
                        bail!(src, span, msg = "Unexpected {} after the root element", token_name(&next));
                    }
                },
            }
        }
    }

    /// State to continue in after an element has been closed.
    fn after_close(&self) -> ParserState {
        if self.stack.is_empty() && !self.is_fragment() {
            ParserState::Epilog
        } else {
            ParserState::TagChildren
        }
    }

    fn open_element(&mut self, name: NodeName, span: Segment, top: &mut Vec<Content>) -> XmlResult<()> {
        let parent = self.stack.last().copied().or(self.base);
        let id = ElementId(self.elements.insert(ElementNode::new(name, span, parent)));

        match parent {
            Some(_) => self.push_content(Content::Element(id), top)?,
            None => self.root = Some(id),
        }
        self.stack.push(id);
        self.created.push(id);
        Ok(())
    }

    fn add_attribute(&mut self, name: NodeName, segment: Segment, value_segment: Segment) -> XmlResult<()> {
        let src = self.src;
        let Some(&owner) = self.stack.last() else {
            bail!(src, segment, msg = "Bug; Cannot apply attribute; stack is empty!");
        };

        let value = decode_entities(value_segment.text(src))
            .map_err(|e| XmlError::at(src, value_segment, XmlErrorKind::MalformedSource(e)))?;
        let attr = AttributeNode {
            owner,
            name,
            namespace_uri: None,
            value,
            segment,
            value_segment,
        };

        if let Some(prefix) = attr.declared_prefix() {
            self.namespaces.put_namespace(prefix, attr.value.as_str());
        }

        let id = AttributeId(self.attributes.insert(attr));
        self.node_mut(owner)?.attributes.push(id);
        Ok(())
    }

    /// Adds content to the innermost open element, or to the fragment's top level.
    fn push_content(&mut self, item: Content, top: &mut Vec<Content>) -> XmlResult<()> {
        match self.stack.last() {
            Some(&id) => self.node_mut(id)?.content.push(item),
            None if self.is_fragment() => top.push(item),
            None => {
                let span = item.segment().unwrap_or_default();
                bail!(self.src, span, msg = "Unexpected content outside the root element");
            }
        }
        Ok(())
    }

    /// Resolve the namespaces of every element and attribute created in this pass.
    ///
    /// Declarations are document-scoped, so this waits until every `xmlns`
    /// attribute has been seen. Unknown prefixes are reported but not fatal.
    fn resolve_namespaces(&mut self) {
        for &id in &self.created {
            let Some(node) = self.elements.get_mut(id.0) else {
                continue;
            };

            node.namespace_uri = match node.name.prefix() {
                Some(prefix) => {
                    let uri = self.namespaces.get(prefix);
                    if uri.is_none() {
                        log::warn!("Element <{}> uses undeclared namespace prefix `{prefix}`", node.name);
                    }
                    uri.map(str::to_string)
                }
                None => self.namespaces.default_namespace().map(str::to_string),
            };

            for attr_id in &node.attributes {
                let Some(attr) = self.attributes.get_mut(attr_id.0) else {
                    continue;
                };
                let Some(prefix) = attr.name.prefix() else {
                    continue;
                };

                let uri = self.namespaces.get(prefix);
                if uri.is_none() {
                    log::warn!("Attribute `{}` uses undeclared namespace prefix `{prefix}`", attr.name);
                }
                attr.namespace_uri = uri.map(str::to_string);
            }
        }
    }

    fn node(&self, id: ElementId) -> XmlResult<&ElementNode> {
        self.elements
            .get(id.0)
            .ok_or_else(|| XmlErrorKind::DetachedNode.into())
    }

    fn node_mut(&mut self, id: ElementId) -> XmlResult<&mut ElementNode> {
        self.elements
            .get_mut(id.0)
            .ok_or_else(|| XmlErrorKind::DetachedNode.into())
    }
}

fn token_span(token: &Token<'_>) -> Segment {
    match token {
        Token::Declaration { span, .. }
        | Token::ProcessingInstruction { span, .. }
        | Token::Comment { span, .. }
        | Token::DtdStart { span, .. }
        | Token::EmptyDtd { span, .. }
        | Token::EntityDeclaration { span, .. }
        | Token::DtdEnd { span }
        | Token::ElementStart { span, .. }
        | Token::Attribute { span, .. }
        | Token::ElementEnd { span, .. }
        | Token::Cdata { span, .. } => (*span).into(),
        Token::Text { text } => (*text).into(),
    }
}

fn token_name(token: &Token<'_>) -> &'static str {
    match token {
        Token::Declaration { .. } => "declaration",
        Token::ProcessingInstruction { .. } => "processing instruction",
        Token::Comment { .. } => "comment",
        Token::DtdStart { .. } | Token::EmptyDtd { .. } | Token::DtdEnd { .. } => "DTD",
        Token::EntityDeclaration { .. } => "entity declaration",
        Token::ElementStart { .. } => "element",
        Token::Attribute { .. } => "attribute",
        Token::ElementEnd { .. } => "tag end",
        Token::Text { .. } => "text",
        Token::Cdata { .. } => "CDATA section",
    }
}

/// Byte offset of a 1-based row and column reported by the tokenizer.
fn offset_of(src: &str, pos: xmlparser::TextPos) -> usize {
    let row = pos.row as usize;
    let col = (pos.col as usize).saturating_sub(1);

    let mut offset = 0;
    for (i, line) in src.split_inclusive('\n').enumerate() {
        if i + 1 == row {
            return offset + line.char_indices().nth(col).map_or(line.len(), |(i, _)| i);
        }
        offset += line.len();
    }

    src.len()
}
