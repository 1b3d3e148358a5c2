//! Edits applied to the buffer and the node model together.
//!
//! Every operation validates first, then splices the buffer once per
//! contiguous change and re-anchors every live segment. A failed operation
//! leaves the document untouched.
use crate::{
    Document, Segment,
    error::{XmlErrorKind, XmlResult},
    indexer::index_fragment,
    node::{AttributeId, AttributeNode, Content, ElementId, NodeName, TextRun},
    pending::NewElement,
    to_xml::{encode_entities, write_element},
};
use std::ops::Range;

impl Document {
    /// Set the text content of an element.
    ///
    /// The first text run is rewritten in place and any other runs are
    /// deleted. If the element has no text, the text is written right before
    /// the close tag. Comments and child elements are kept. Setting the
    /// current text again changes nothing.
    ///
    /// # Errors
    /// - [`XmlErrorKind::VoidElementOperation`] if the element is written `<name/>`
    /// - [`XmlErrorKind::DetachedNode`] if the element was removed
    pub fn set_text(&mut self, id: ElementId, text: &str) -> XmlResult<()> {
        let node = self.node(id)?;
        if node.is_void() {
            return Err(XmlErrorKind::VoidElementOperation(node.name.to_string()).into());
        }
        if node.text() == text {
            return Ok(());
        }

        let escaped = encode_entities(text)?;
        let close = node.close.start();
        let runs: Vec<(usize, Segment)> = node
            .content
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_text().map(|run| (i, run.segment())))
            .collect();

        let Some((&(first, segment), rest)) = runs.split_first() else {
            self.splice(close..close, &escaped);
            let run = TextRun::new(Segment::with_len(close, escaped.len()), text);
            self.node_mut(id)?.content.push(Content::Text(run));
            return Ok(());
        };

        for &(index, segment) in rest.iter().rev() {
            self.node_mut(id)?.content.remove(index);
            self.splice(segment.range(), "");
        }

        if text.is_empty() {
            self.node_mut(id)?.content.remove(first);
            self.splice(segment.range(), "");
            return Ok(());
        }

        self.splice(segment.range(), &escaped);
        if let Some(Content::Text(run)) = self.node_mut(id)?.content.get_mut(first) {
            *run = TextRun::new(Segment::with_len(segment.start(), escaped.len()), text);
        }
        Ok(())
    }

    /// Set an attribute on an element.
    ///
    /// An existing attribute has its value replaced in place (see
    /// [`Document::set_attribute_value`]). Otherwise ` name="value"` is
    /// written after the last attribute of the open tag. Setting an `xmlns` or
    /// `xmlns:prefix` attribute registers the namespace.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidArgument`] if the name is not a valid qualified name
    /// - [`XmlErrorKind::UnresolvedNamespacePrefix`] if the name uses an unregistered prefix
    /// - [`XmlErrorKind::DetachedNode`] if the element was removed
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> XmlResult<AttributeId> {
        let node = self.node(id)?;
        let existing = node.attributes.iter().copied().find(|&a| {
            self.attributes
                .get(a.0)
                .is_some_and(|attr| attr.name == name)
        });
        if let Some(existing) = existing {
            self.set_attribute_value(existing, value)?;
            return Ok(existing);
        }

        let parsed = NodeName::parse(name)?;
        let mut attr = AttributeNode {
            owner: id,
            name: parsed,
            namespace_uri: None,
            value: value.to_string(),
            segment: Segment::default(),
            value_segment: Segment::default(),
        };
        let declared = attr.declared_prefix().map(str::to_string);
        if declared.is_none() {
            if let Some(prefix) = attr.name.prefix() {
                attr.namespace_uri = Some(self.namespaces.resolve(prefix)?.to_string());
            }
        }

        let escaped = encode_entities(value)?;
        let at = match node.attributes.last() {
            Some(last) => self.attr_node(*last)?.segment.end(),
            None => node.open.start() + 1 + node.name.len(),
        };

        let bytes = format!(r#" {name}="{escaped}""#);
        self.splice(at..at, &bytes);
        attr.segment = Segment::new(at + 1, at + bytes.len());
        attr.value_segment = Segment::with_len(at + 1 + name.len() + 2, escaped.len());

        if let Some(prefix) = declared {
            self.namespaces.put_namespace(prefix, value);
        }

        let attr_id = AttributeId(self.attributes.insert(attr));
        self.node_mut(id)?.attributes.push(attr_id);
        Ok(attr_id)
    }

    /// Replace the value of an attribute. Only the bytes between the quotes change.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::DetachedNode`] if the attribute was removed.
    pub fn set_attribute_value(&mut self, id: AttributeId, value: &str) -> XmlResult<()> {
        let attr = self.attr_node(id)?;
        if attr.value == value {
            return Ok(());
        }

        let escaped = encode_entities(value)?;
        let range = attr.value_segment.range();
        let declared = attr.declared_prefix().map(str::to_string);

        self.splice(range.clone(), &escaped);
        let attr = self.attr_node_mut(id)?;
        attr.value = value.to_string();
        attr.value_segment = Segment::with_len(range.start, escaped.len());

        if let Some(prefix) = declared {
            self.namespaces.put_namespace(prefix, value);
        }
        Ok(())
    }

    /// Remove an attribute by name. Does nothing if the element has no such attribute.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::DetachedNode`] if the element was removed.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> XmlResult<()> {
        let node = self.node(id)?;
        let existing = node.attributes.iter().copied().find(|&a| {
            self.attributes
                .get(a.0)
                .is_some_and(|attr| attr.name == name)
        });

        match existing {
            Some(attr) => self.remove_attribute_node(attr),
            None => Ok(()),
        }
    }

    /// Remove an attribute, along with the whitespace separating it from what precedes it.
    ///
    /// Namespaces declared by the attribute stay registered.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::DetachedNode`] if the attribute was removed.
    pub fn remove_attribute_node(&mut self, id: AttributeId) -> XmlResult<()> {
        let attr = self.attr_node(id)?;
        let owner = attr.owner;
        let segment = attr.segment;
        let start = self.buffer[..segment.start()]
            .trim_end_matches(|c: char| c.is_ascii_whitespace())
            .len();

        self.node_mut(owner)?.attributes.retain(|&a| a != id);
        self.attributes.remove(id.0);
        self.splice(start..segment.end(), "");
        Ok(())
    }

    /// Append a new element as the last child element of `parent`.
    ///
    /// The element is written on a new line after the last child element,
    /// comment, CDATA section or processing instruction, or right after the
    /// open tag if there are none, indented to its depth. Trailing text before
    /// the close tag stays where it is.
    ///
    /// # Errors
    /// - [`XmlErrorKind::VoidElementOperation`] if the parent is written `<name/>`
    /// - [`XmlErrorKind::InvalidArgument`] or [`XmlErrorKind::UnresolvedNamespacePrefix`]
    ///   if the new subtree has an invalid name
    /// - [`XmlErrorKind::DetachedNode`] if the parent was removed
    pub fn append_child(&mut self, parent: ElementId, child: &NewElement) -> XmlResult<ElementId> {
        let node = self.node(parent)?;
        if node.is_void() {
            return Err(XmlErrorKind::VoidElementOperation(node.name.to_string()).into());
        }
        child.validate(&self.namespaces)?;

        let last = node
            .content
            .iter()
            .enumerate()
            .rev()
            .find(|(_, item)| !matches!(item, Content::Text(_)));
        let (at, index) = match last {
            Some((i, Content::Element(child))) => (self.node(*child)?.close.end(), i + 1),
            Some((i, item)) => (item.segment().map_or(node.open.end(), |s| s.end()), i + 1),
            None => (node.open.end(), 0),
        };

        let depth = self.depth(parent) + 1;
        let indent = self.options.indent_for(depth);
        let xml = write_element(child, &self.options.indent, depth)?;
        self.insert_fragment(parent, at, index, &format!("\n{indent}{xml}"))
    }

    /// Insert a new element as the next sibling of `target`, on its own line.
    ///
    /// # Errors
    /// - [`XmlErrorKind::NotPermittedOnRoot`] if `target` is the root
    /// - [`XmlErrorKind::InvalidArgument`] or [`XmlErrorKind::UnresolvedNamespacePrefix`]
    ///   if the new subtree has an invalid name
    /// - [`XmlErrorKind::DetachedNode`] if `target` was removed
    pub fn insert_after(&mut self, target: ElementId, element: &NewElement) -> XmlResult<ElementId> {
        let node = self.node(target)?;
        let Some(parent) = node.parent else {
            return Err(XmlErrorKind::NotPermittedOnRoot.into());
        };
        element.validate(&self.namespaces)?;

        let at = node.close.end();
        let index = self.child_index(parent, target)? + 1;

        let depth = self.depth(target);
        let indent = self.options.indent_for(depth);
        let xml = write_element(element, &self.options.indent, depth)?;
        self.insert_fragment(parent, at, index, &format!("\n{indent}{xml}"))
    }

    /// Insert a new element as the previous sibling of `target`.
    ///
    /// If `target` has a previous sibling element, this is an insert after
    /// that sibling. Otherwise the element is written right before the open
    /// tag of `target`, followed by a new line.
    ///
    /// # Errors
    /// - [`XmlErrorKind::NotPermittedOnRoot`] if `target` is the root
    /// - [`XmlErrorKind::InvalidArgument`] or [`XmlErrorKind::UnresolvedNamespacePrefix`]
    ///   if the new subtree has an invalid name
    /// - [`XmlErrorKind::DetachedNode`] if `target` was removed
    pub fn insert_before(&mut self, target: ElementId, element: &NewElement) -> XmlResult<ElementId> {
        let node = self.node(target)?;
        let Some(parent) = node.parent else {
            return Err(XmlErrorKind::NotPermittedOnRoot.into());
        };

        let index = self.child_index(parent, target)?;
        let previous = self.node(parent)?.content[..index]
            .iter()
            .rev()
            .find_map(Content::as_element);
        if let Some(previous) = previous {
            return self.insert_after(previous, element);
        }

        element.validate(&self.namespaces)?;
        let at = node.open.start();
        let depth = self.depth(target);
        let indent = self.options.indent_for(depth);
        let xml = write_element(element, &self.options.indent, depth)?;
        self.insert_fragment(parent, at, index, &format!("{xml}\n{indent}"))
    }

    /// Replace `target` with a new element. Returns the new element.
    ///
    /// # Errors
    /// As [`Document::insert_after`] and [`Document::remove`].
    pub fn replace_with(&mut self, target: ElementId, element: &NewElement) -> XmlResult<ElementId> {
        let id = self.insert_after(target, element)?;
        self.remove(target)?;
        Ok(id)
    }

    /// Remove an element and everything inside it.
    ///
    /// A text run directly before the element is removed with it, which takes
    /// the element's indentation along. A comment directly before it is kept.
    /// Handles to the element, its descendants and their attributes become stale.
    ///
    /// # Errors
    /// - [`XmlErrorKind::NotPermittedOnRoot`] if `target` is the root
    /// - [`XmlErrorKind::DetachedNode`] if `target` was already removed
    pub fn remove(&mut self, target: ElementId) -> XmlResult<()> {
        let node = self.node(target)?;
        let Some(parent) = node.parent else {
            return Err(XmlErrorKind::NotPermittedOnRoot.into());
        };

        let span = node.span();
        let index = self.child_index(parent, target)?;
        let siblings = &self.node(parent)?.content;
        let (first, start) = match index.checked_sub(1).and_then(|i| siblings.get(i)) {
            Some(Content::Text(run)) => (index - 1, run.segment().start()),
            _ => (index, span.start()),
        };

        self.node_mut(parent)?.content.drain(first..=index);
        self.free_subtree(target);
        self.splice(start..span.end(), "");
        Ok(())
    }

    /// Remove every child element with the given name. Returns how many were removed.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::DetachedNode`] if `parent` was removed.
    pub fn remove_children(&mut self, parent: ElementId, name: &str) -> XmlResult<usize> {
        let matching: Vec<ElementId> = self
            .element(parent)?
            .children_named(name)
            .iter()
            .map(|c| c.id())
            .collect();

        for &child in &matching {
            self.remove(child)?;
        }
        Ok(matching.len())
    }

    /// Remove the only child element with the given name, if there is one.
    ///
    /// Returns true if an element was removed.
    ///
    /// # Errors
    /// - [`XmlErrorKind::AmbiguousMatch`] if more than one child has the name
    /// - [`XmlErrorKind::DetachedNode`] if `parent` was removed
    pub fn remove_child(&mut self, parent: ElementId, name: &str) -> XmlResult<bool> {
        let child = self.element(parent)?.get_single_child(name)?.map(|c| c.id());
        match child {
            Some(child) => {
                self.remove(child)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set the text of the only child element with the given name.
    ///
    /// If there is no such child and `create` is set, a new child holding the
    /// text is appended. Returns the child, if one exists afterwards.
    ///
    /// # Errors
    /// - [`XmlErrorKind::AmbiguousMatch`] if more than one child has the name
    /// - [`XmlErrorKind::DetachedNode`] if `parent` was removed
    /// - Any error of [`Document::set_text`] or [`Document::append_child`]
    pub fn set_child_text(
        &mut self,
        parent: ElementId,
        name: &str,
        text: &str,
        create: bool,
    ) -> XmlResult<Option<ElementId>> {
        let child = self.element(parent)?.get_single_child(name)?.map(|c| c.id());
        match child {
            Some(child) => {
                self.set_text(child, text)?;
                Ok(Some(child))
            }
            None if create => {
                let id = self.append_child(parent, &NewElement::with_text(name, text))?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Replace `range` of the buffer with `bytes`, and re-anchor every live segment.
    pub(crate) fn splice(&mut self, range: Range<usize>, bytes: &str) {
        let delta = bytes.len() as isize - range.len() as isize;
        let edit_end = range.end;
        log::debug!("splice {range:?} -> {} bytes (delta {delta})", bytes.len());
        self.buffer.replace_range(range, bytes);

        if delta == 0 {
            return;
        }

        let mut moved = 0usize;
        let segments = self
            .elements
            .values_mut()
            .flat_map(|node| node.segments_mut())
            .chain(self.attributes.values_mut().flat_map(|attr| attr.segments_mut()));
        for segment in segments {
            let before = *segment;
            segment.shift(edit_end, delta);
            if *segment != before {
                moved += 1;
            }
        }
        log::trace!("re-anchored {moved} segments");
    }

    /// Splice `bytes` in at `at`, and index them as content of `parent` starting at `index`.
    /// Returns the first element of the fragment.
    fn insert_fragment(&mut self, parent: ElementId, at: usize, index: usize, bytes: &str) -> XmlResult<ElementId> {
        self.splice(at..at, bytes);

        let range = at..at + bytes.len();
        let items = match index_fragment(
            &self.buffer,
            range.clone(),
            parent,
            &mut self.elements,
            &mut self.attributes,
            &mut self.namespaces,
        ) {
            Ok(items) => items,
            Err(e) => {
                self.splice(range, "");
                return Err(e);
            }
        };

        let Some(id) = items.iter().find_map(Content::as_element) else {
            self.splice(range, "");
            return Err(XmlErrorKind::MalformedSource("inserted content has no element".to_string()).into());
        };

        let node = self.node_mut(parent)?;
        let index = index.min(node.content.len());
        node.content.splice(index..index, items);
        Ok(id)
    }

    /// Index of a child element in its parent's content.
    fn child_index(&self, parent: ElementId, child: ElementId) -> XmlResult<usize> {
        self.node(parent)?
            .position_of(child)
            .ok_or_else(|| XmlErrorKind::DetachedNode.into())
    }

    /// Drop an element, its descendants, and all their attributes from the arenas.
    fn free_subtree(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.elements.remove(id.0) else {
                continue;
            };

            for attr in node.attributes {
                self.attributes.remove(attr.0);
            }
            stack.extend(node.content.iter().filter_map(Content::as_element));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Document {
        Document::parse_str(src).unwrap()
    }

    fn child(doc: &Document, name: &str) -> ElementId {
        doc.root().get_single_child(name).unwrap().unwrap().id()
    }

    #[test]
    fn test_set_text_in_place() {
        let mut doc = parse("<a><b>old</b><c/></a>");
        let b = child(&doc, "b");
        doc.set_text(b, "new & improved").unwrap();

        assert_eq!(doc.as_str(), "<a><b>new &amp; improved</b><c/></a>");
        assert_eq!(doc.element(b).unwrap().text(), "new & improved");
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_set_text_without_runs() {
        let mut doc = parse("<a><b></b></a>");
        let b = child(&doc, "b");
        doc.set_text(b, "x").unwrap();

        assert_eq!(doc.as_str(), "<a><b>x</b></a>");
        assert_eq!(doc.element(b).unwrap().text(), "x");
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_set_text_mixed_content() {
        let mut doc = parse("<root>text-before<!--c--><test/>text-after</root>");
        let root = doc.root().id();
        doc.set_text(root, "new text").unwrap();

        assert_eq!(doc.as_str(), "<root>new text<!--c--><test/></root>");
        assert_eq!(doc.root().text(), "new text");
        assert!(doc.root().has_child("test"));
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_set_text_idempotent() {
        let src = "<a><b>same</b></a>";
        let mut doc = parse(src);
        let b = child(&doc, "b");
        doc.set_text(b, "same").unwrap();
        assert_eq!(doc.as_str(), src);
    }

    #[test]
    fn test_set_text_empty_removes_run() {
        let mut doc = parse("<a><b>old</b></a>");
        let b = child(&doc, "b");
        doc.set_text(b, "").unwrap();
        assert_eq!(doc.as_str(), "<a><b></b></a>");
        assert_eq!(doc.element(b).unwrap().text_runs().count(), 0);
    }

    #[test]
    fn test_set_text_void() {
        let src = "<a><b/></a>";
        let mut doc = parse(src);
        let b = child(&doc, "b");
        let err = doc.set_text(b, "x").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::VoidElementOperation(ref n) if n == "b"));
        assert_eq!(doc.as_str(), src);
    }

    #[test]
    fn test_set_existing_attribute() {
        let mut doc = parse(r#"<a x="1" y='2'><b/></a>"#);
        let root = doc.root().id();
        doc.set_attribute(root, "x", "10").unwrap();

        assert_eq!(doc.as_str(), r#"<a x="10" y='2'><b/></a>"#);
        let y = doc.root().attribute("y").unwrap();
        assert_eq!(y.source(), "y='2'");
        assert_eq!(doc.root().attribute_value("x"), Some("10"));
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_add_attribute() {
        let mut doc = parse(r#"<a x="1"><b/><c>t</c></a>"#);
        let root = doc.root().id();
        let b = child(&doc, "b");
        let c = child(&doc, "c");

        doc.set_attribute(root, "z", "3").unwrap();
        doc.set_attribute(b, "z", "<4>").unwrap();
        doc.set_attribute(c, "z", "5").unwrap();

        assert_eq!(
            doc.as_str(),
            r#"<a x="1" z="3"><b z="&lt;4&gt;"/><c z="5">t</c></a>"#
        );
        assert_eq!(doc.element(b).unwrap().attribute_value("z"), Some("<4>"));
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_attribute_prefixes() {
        let src = "<a/>";
        let mut doc = parse(src);
        let root = doc.root().id();

        let err = doc.set_attribute(root, "p:x", "1").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::UnresolvedNamespacePrefix(ref p) if p == "p"));
        assert_eq!(doc.as_str(), src);

        doc.set_attribute(root, "xmlns:p", "urn:p").unwrap();
        let attr = doc.set_attribute(root, "p:x", "1").unwrap();
        assert_eq!(doc.attribute(attr).unwrap().namespace_uri(), Some("urn:p"));
        assert_eq!(doc.namespaces().get("p"), Some("urn:p"));
        assert_eq!(doc.as_str(), r#"<a xmlns:p="urn:p" p:x="1"/>"#);
    }

    #[test]
    fn test_remove_attribute() {
        let src = r#"<a x="1"  y="2"/>"#;
        let mut doc = parse(src);
        let root = doc.root().id();
        doc.remove_attribute(root, "x").unwrap();
        assert_eq!(doc.as_str(), r#"<a  y="2"/>"#);

        let mut doc = parse(src);
        let root = doc.root().id();
        doc.remove_attribute(root, "y").unwrap();
        assert_eq!(doc.as_str(), r#"<a x="1"/>"#);

        doc.remove_attribute(root, "missing").unwrap();
        assert_eq!(doc.as_str(), r#"<a x="1"/>"#);
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_append_child() {
        let src = "<root>\n    <a/>\n</root>";
        let mut doc = parse(src);
        let root = doc.root().id();
        let b = doc.append_child(root, &NewElement::new("b")).unwrap();

        assert_eq!(doc.as_str(), "<root>\n    <a/>\n    <b/>\n</root>");
        assert_eq!(doc.root().last_child().unwrap().id(), b);
        doc.verify_segments().unwrap();

        doc.remove(b).unwrap();
        assert_eq!(doc.as_str(), src);
    }

    #[test]
    fn test_append_child_without_children() {
        let mut doc = parse("<root>text</root>");
        let root = doc.root().id();
        doc.append_child(root, &NewElement::with_text("b", "c")).unwrap();

        assert_eq!(doc.as_str(), "<root>\n    <b>c</b>text</root>");
        assert_eq!(doc.root().child_text("b").as_deref(), Some("c"));
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_append_child_after_trailing_comment() {
        let src = "<root>\n    <a/>\n    <!-- c -->\n</root>";
        let mut doc = parse(src);
        let root = doc.root().id();
        let b = doc.append_child(root, &NewElement::new("b")).unwrap();

        assert_eq!(doc.as_str(), "<root>\n    <a/>\n    <!-- c -->\n    <b/>\n</root>");
        assert_eq!(doc.root().last_child().unwrap().id(), b);
        doc.verify_segments().unwrap();

        doc.remove(b).unwrap();
        assert_eq!(doc.as_str(), src);
    }

    #[test]
    fn test_append_child_to_void() {
        let mut doc = parse("<root><a/></root>");
        let a = child(&doc, "a");
        let err = doc.append_child(a, &NewElement::new("b")).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::VoidElementOperation(_)));
    }

    #[test]
    fn test_insert_siblings() {
        let src = "<root>\n    <a/>\n    <c/>\n</root>";
        let mut doc = parse(src);
        let a = child(&doc, "a");
        let c = child(&doc, "c");

        let b = doc.insert_before(c, &NewElement::new("b")).unwrap();
        assert_eq!(doc.as_str(), "<root>\n    <a/>\n    <b/>\n    <c/>\n</root>");
        assert_eq!(doc.element(b).unwrap().previous_sibling().unwrap().id(), a);

        let z = doc.insert_before(a, &NewElement::new("z")).unwrap();
        assert_eq!(doc.as_str(), "<root>\n    <z/>\n    <a/>\n    <b/>\n    <c/>\n</root>");
        assert_eq!(doc.root().first_child().unwrap().id(), z);

        let d = doc.insert_after(c, &NewElement::new("d")).unwrap();
        assert_eq!(doc.root().last_child().unwrap().id(), d);
        doc.verify_segments().unwrap();

        for id in [z, b, d] {
            doc.remove(id).unwrap();
        }
        assert_eq!(doc.as_str(), src);
    }

    #[test]
    fn test_root_restrictions() {
        let mut doc = parse("<root/>");
        let root = doc.root().id();
        for err in [
            doc.remove(root).unwrap_err(),
            doc.insert_after(root, &NewElement::new("x")).unwrap_err(),
            doc.insert_before(root, &NewElement::new("x")).unwrap_err(),
        ] {
            assert!(matches!(err.kind, XmlErrorKind::NotPermittedOnRoot));
        }
        assert_eq!(doc.as_str(), "<root/>");
    }

    #[test]
    fn test_remove_preceding_text() {
        let mut doc = parse("<root>text-before<test>text-inside</test>text-after</root>");
        let test = child(&doc, "test");
        doc.remove(test).unwrap();
        assert_eq!(doc.as_str(), "<root>text-after</root>");

        let mut doc = parse("<root><!--comment--><test>text-inside</test>text-after</root>");
        let test = child(&doc, "test");
        doc.remove(test).unwrap();
        assert_eq!(doc.as_str(), "<root><!--comment-->text-after</root>");
    }

    #[test]
    fn test_stale_handles() {
        let mut doc = parse(r#"<root><a x="1"><b/></a></root>"#);
        let a = child(&doc, "a");
        let b = doc.element(a).unwrap().first_child().unwrap().id();
        let x = doc.element(a).unwrap().attribute("x").unwrap().id();
        doc.remove(a).unwrap();

        assert!(matches!(doc.element(a).unwrap_err().kind, XmlErrorKind::DetachedNode));
        assert!(matches!(doc.element(b).unwrap_err().kind, XmlErrorKind::DetachedNode));
        assert!(matches!(doc.set_text(b, "x").unwrap_err().kind, XmlErrorKind::DetachedNode));
        assert!(matches!(
            doc.set_attribute_value(x, "2").unwrap_err().kind,
            XmlErrorKind::DetachedNode
        ));
        assert_eq!(doc.as_str(), "<root></root>");
    }

    #[test]
    fn test_replace_with() {
        let mut doc = parse("<root>\n    <old/>\n</root>");
        let old = child(&doc, "old");
        let new = doc.replace_with(old, &NewElement::with_text("new", "1")).unwrap();

        assert_eq!(doc.as_str(), "<root>\n    <new>1</new>\n</root>");
        assert!(doc.element(old).is_err());
        assert_eq!(doc.element(new).unwrap().text(), "1");
        doc.verify_segments().unwrap();
    }

    #[test]
    fn test_remove_children() {
        let mut doc = parse("<root>\n  <a/>\n  <b/>\n  <a/>\n</root>");
        let root = doc.root().id();

        let err = doc.remove_child(root, "a").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::AmbiguousMatch(_)));

        assert_eq!(doc.remove_children(root, "a").unwrap(), 2);
        assert_eq!(doc.as_str(), "<root>\n  <b/>\n</root>");

        assert!(doc.remove_child(root, "b").unwrap());
        assert!(!doc.remove_child(root, "b").unwrap());
        assert_eq!(doc.as_str(), "<root>\n</root>");
    }

    #[test]
    fn test_set_child_text() {
        let mut doc = parse("<dep>\n    <version>1.0</version>\n</dep>");
        let root = doc.root().id();

        doc.set_child_text(root, "version", "2.0", false).unwrap();
        assert!(doc.set_child_text(root, "scope", "test", false).unwrap().is_none());
        doc.set_child_text(root, "scope", "test", true).unwrap();

        assert_eq!(
            doc.as_str(),
            "<dep>\n    <version>2.0</version>\n    <scope>test</scope>\n</dep>"
        );
    }

    #[test]
    fn test_nested_append_indentation() {
        let mut doc = parse("<project>\n    <deps>\n        <dep/>\n    </deps>\n</project>");
        let deps = child(&doc, "deps");
        let dep = NewElement::with_children(
            "dep",
            [
                NewElement::with_text("groupId", "g"),
                NewElement::with_text("artifactId", "a"),
            ],
        );
        doc.append_child(deps, &dep).unwrap();

        assert_eq!(
            doc.as_str(),
            "<project>\n    <deps>\n        <dep/>\n        <dep>\n            <groupId>g</groupId>\n            <artifactId>a</artifactId>\n        </dep>\n    </deps>\n</project>"
        );
        doc.verify_segments().unwrap();
    }
}
