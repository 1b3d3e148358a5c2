//! Locating nodes with path expressions.
//!
//! Path evaluation is pluggable: a [`PathEvaluator`] sees the document only
//! through the read-only [`NavigableTree`] trait. The default evaluator is
//! [`crate::path::LocationPathEvaluator`].
use crate::{
    Document,
    error::{XmlErrorKind, XmlResult},
    node::{Attribute, AttributeId, Element, ElementId, NodeName, single},
};

/// A node selected by a path expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMatch {
    /// An element
    Element(ElementId),

    /// An attribute
    Attribute(AttributeId),

    /// The text of an element, selected with `text()`
    Text(ElementId),
}
impl QueryMatch {
    /// Returns the element, if this is an element match.
    #[must_use]
    pub fn as_element(&self) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(*id),
            _ => None,
        }
    }
}

/// Read-only view of a document tree, for path evaluators.
pub trait NavigableTree {
    /// The root element.
    fn root(&self) -> ElementId;

    /// Parent of an element; `None` for the root or a removed element.
    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Child elements, in document order.
    fn children(&self, id: ElementId) -> Vec<ElementId>;

    /// Attributes of an element, in document order.
    fn attributes(&self, id: ElementId) -> Vec<AttributeId>;

    /// Qualified name of an element.
    fn element_name(&self, id: ElementId) -> Option<&NodeName>;

    /// Qualified name of an attribute.
    fn attribute_name(&self, id: AttributeId) -> Option<&NodeName>;

    /// Decoded value of an attribute.
    fn attribute_value(&self, id: AttributeId) -> Option<&str>;

    /// Decoded text of an element, excluding child elements.
    fn element_text(&self, id: ElementId) -> String;

    /// True if the element holds at least one text run.
    fn has_text(&self, id: ElementId) -> bool;
}

/// Evaluates path expressions against a [`NavigableTree`].
pub trait PathEvaluator: Send + Sync {
    /// Returns every node the expression selects, in document order.
    ///
    /// # Errors
    /// Should fail with [`XmlErrorKind::InvalidPathExpression`] if the expression is not understood.
    fn evaluate(&self, tree: &dyn NavigableTree, expr: &str) -> XmlResult<Vec<QueryMatch>>;
}

impl NavigableTree for Document {
    fn root(&self) -> ElementId {
        self.root
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id.0).and_then(|node| node.parent)
    }

    fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.elements
            .get(id.0)
            .map(|node| node.children().collect())
            .unwrap_or_default()
    }

    fn attributes(&self, id: ElementId) -> Vec<AttributeId> {
        self.elements
            .get(id.0)
            .map(|node| node.attributes.clone())
            .unwrap_or_default()
    }

    fn element_name(&self, id: ElementId) -> Option<&NodeName> {
        self.elements.get(id.0).map(|node| &node.name)
    }

    fn attribute_name(&self, id: AttributeId) -> Option<&NodeName> {
        self.attributes.get(id.0).map(|attr| &attr.name)
    }

    fn attribute_value(&self, id: AttributeId) -> Option<&str> {
        self.attributes.get(id.0).map(|attr| attr.value.as_str())
    }

    fn element_text(&self, id: ElementId) -> String {
        self.elements
            .get(id.0)
            .map(|node| node.text())
            .unwrap_or_default()
    }

    fn has_text(&self, id: ElementId) -> bool {
        self.elements
            .get(id.0)
            .is_some_and(|node| node.text_runs().next().is_some())
    }
}

impl Document {
    /// Returns every node selected by a path expression.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::InvalidPathExpression`] if the expression is not understood.
    pub fn find_all(&self, expr: &str) -> XmlResult<Vec<QueryMatch>> {
        self.evaluator.evaluate(self, expr)
    }

    /// Returns the only node selected by a path expression, or `None`.
    ///
    /// # Errors
    /// - [`XmlErrorKind::AmbiguousMatch`] if more than one node is selected
    /// - [`XmlErrorKind::InvalidPathExpression`] if the expression is not understood
    pub fn find_one(&self, expr: &str) -> XmlResult<Option<QueryMatch>> {
        single(self.find_all(expr)?.into_iter(), expr)
    }

    /// Returns every element selected by a path expression.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidPathExpression`] if the expression is not understood,
    ///   or selects attributes or text
    pub fn get_elements(&self, expr: &str) -> XmlResult<Vec<Element<'_>>> {
        self.find_all(expr)?
            .into_iter()
            .map(|m| self.match_element(expr, m))
            .collect()
    }

    /// Returns the only element selected by a path expression, or `None`.
    ///
    /// # Errors
    /// - [`XmlErrorKind::AmbiguousMatch`] if more than one element is selected
    /// - [`XmlErrorKind::InvalidPathExpression`] if the expression is not understood,
    ///   or selects attributes or text
    pub fn get_single_element(&self, expr: &str) -> XmlResult<Option<Element<'_>>> {
        self.find_one(expr)?
            .map(|m| self.match_element(expr, m))
            .transpose()
    }

    /// Returns the text of every node selected by a path expression.
    ///
    /// The text of an attribute is its value.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::InvalidPathExpression`] if the expression is not understood.
    pub fn get_text(&self, expr: &str) -> XmlResult<Vec<String>> {
        self.find_all(expr)?
            .into_iter()
            .map(|m| self.match_text(m))
            .collect()
    }

    /// Returns the text of the only node selected by a path expression, or `None`.
    ///
    /// # Errors
    /// - [`XmlErrorKind::AmbiguousMatch`] if more than one node is selected
    /// - [`XmlErrorKind::InvalidPathExpression`] if the expression is not understood
    pub fn get_single_text(&self, expr: &str) -> XmlResult<Option<String>> {
        self.find_one(expr)?.map(|m| self.match_text(m)).transpose()
    }

    /// Set the text of every element, or the value of every attribute, selected by
    /// a path expression. Returns how many nodes were updated.
    ///
    /// Every match is checked before the first edit, so a failure changes nothing.
    ///
    /// # Errors
    /// - [`XmlErrorKind::NoMatch`] if nothing is selected
    /// - Any error of [`Document::set_text`] or [`Document::set_attribute_value`]
    pub fn update_text(&mut self, expr: &str, text: &str) -> XmlResult<usize> {
        let matches = self.find_all(expr)?;
        if matches.is_empty() {
            return Err(XmlErrorKind::NoMatch(expr.to_string()).into());
        }

        for m in &matches {
            match *m {
                QueryMatch::Element(id) | QueryMatch::Text(id) => {
                    let node = self.node(id)?;
                    if node.is_void() {
                        return Err(XmlErrorKind::VoidElementOperation(node.name.to_string()).into());
                    }
                }
                QueryMatch::Attribute(id) => {
                    self.attr_node(id)?;
                }
            }
        }

        for m in &matches {
            match *m {
                QueryMatch::Element(id) | QueryMatch::Text(id) => self.set_text(id, text)?,
                QueryMatch::Attribute(id) => self.set_attribute_value(id, text)?,
            }
        }
        Ok(matches.len())
    }

    /// Remove every element selected by a path expression. Returns how many were removed.
    ///
    /// Elements nested in an element removed earlier in the same call are skipped.
    ///
    /// # Errors
    /// - [`XmlErrorKind::NoMatch`] if nothing is selected
    /// - [`XmlErrorKind::InvalidPathExpression`] if the expression selects attributes or text
    /// - [`XmlErrorKind::NotPermittedOnRoot`] if the expression selects the root
    pub fn remove_element(&mut self, expr: &str) -> XmlResult<usize> {
        let matches = self.find_all(expr)?;
        if matches.is_empty() {
            return Err(XmlErrorKind::NoMatch(expr.to_string()).into());
        }

        let mut ids = Vec::with_capacity(matches.len());
        for m in matches {
            let id = self.match_element(expr, m)?.id();
            if id == self.root {
                return Err(XmlErrorKind::NotPermittedOnRoot.into());
            }
            ids.push(id);
        }

        let mut removed = 0;
        for id in ids {
            if self.contains(id) {
                self.remove(id)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Returns the text of a match: the text of an element, or the value of an attribute.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::DetachedNode`] if the node was removed.
    pub fn match_text(&self, m: QueryMatch) -> XmlResult<String> {
        match m {
            QueryMatch::Element(id) | QueryMatch::Text(id) => Ok(self.element(id)?.text()),
            QueryMatch::Attribute(id) => Ok(self.attribute(id)?.value().to_string()),
        }
    }

    /// Returns the attribute of an attribute match.
    ///
    /// # Errors
    /// - [`XmlErrorKind::InvalidArgument`] if the match is not an attribute
    /// - [`XmlErrorKind::DetachedNode`] if the attribute was removed
    pub fn match_attribute(&self, m: QueryMatch) -> XmlResult<Attribute<'_>> {
        match m {
            QueryMatch::Attribute(id) => self.attribute(id),
            _ => Err(XmlErrorKind::InvalidArgument(format!("{m:?} is not an attribute")).into()),
        }
    }

    fn match_element(&self, expr: &str, m: QueryMatch) -> XmlResult<Element<'_>> {
        match m {
            QueryMatch::Element(id) => self.element(id),
            _ => Err(XmlErrorKind::InvalidPathExpression(format!("`{expr}` selects attributes or text, not elements")).into()),
        }
    }
}
