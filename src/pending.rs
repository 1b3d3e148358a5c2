//! Pending nodes: elements and attributes built by the caller, not yet part of a document.
//!
//! A pending subtree has no segments. It is serialized and spliced into the
//! buffer by [`crate::Document::append_child`] and friends, and then indexed
//! like any other content.
use crate::{
    error::{XmlErrorKind, XmlResult},
    namespace::{NamespaceRegistry, XMLNS_PREFIX},
    node::NodeName,
};

/// An attribute to be written into a document: `name="value"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttribute {
    name: String,
    value: String,
}
impl NewAttribute {
    /// Create a new attribute. The value is escaped when written.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the qualified name of the attribute.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unescaped value of the attribute.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An element to be written into a document, with its attributes and children.
///
/// ```
/// use xmledit::NewElement;
///
/// let dependency = NewElement::new("dependency")
///     .with_child(NewElement::with_text("groupId", "org.example"))
///     .with_child(NewElement::with_text("artifactId", "widget"))
///     .with_attribute("optional", "true");
/// assert_eq!(dependency.children().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewElement {
    name: String,
    text: Option<String>,
    attributes: Vec<NewAttribute>,
    children: Vec<NewElement>,
}
impl NewElement {
    /// Create an empty element, written as `<name/>` unless content is added.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            attributes: vec![],
            children: vec![],
        }
    }

    /// Create an element holding only text: `<name>text</name>`
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.text = Some(text.into());
        element
    }

    /// Create an element with the given children.
    pub fn with_children(name: impl Into<String>, children: impl IntoIterator<Item = NewElement>) -> Self {
        let mut element = Self::new(name);
        element.children.extend(children);
        element
    }

    /// Builder form of [`NewElement::append_child`].
    #[must_use]
    pub fn with_child(mut self, child: NewElement) -> Self {
        self.children.push(child);
        self
    }

    /// Builder form of [`NewElement::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Add a child element after any existing children.
    pub fn append_child(&mut self, child: NewElement) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing the value of an attribute with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(NewAttribute { name, value }),
        }
        self
    }

    /// Set the text content of the element.
    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Returns the qualified name of the element.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text content of the element, if any was set.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the attributes, in the order they will be written.
    #[must_use]
    pub fn attributes(&self) -> &[NewAttribute] {
        &self.attributes
    }

    /// Returns the value of the attribute with the given name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(NewAttribute::value)
    }

    /// Returns the child elements, in the order they will be written.
    #[must_use]
    pub fn children(&self) -> &[NewElement] {
        &self.children
    }

    /// True if the element will be written in void form `<name/>`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.text.as_deref().is_none_or(str::is_empty) && self.children.is_empty()
    }

    /// Check every name in the subtree, and that every prefix used is bound,
    /// either in `namespaces` or by an `xmlns` attribute within the subtree.
    pub(crate) fn validate(&self, namespaces: &NamespaceRegistry) -> XmlResult<()> {
        let mut declared = vec![];
        let mut names = vec![];

        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            names.push(NodeName::parse(&element.name)?);
            for attr in &element.attributes {
                let name = NodeName::parse(&attr.name)?;
                match name.prefix() {
                    Some(XMLNS_PREFIX) => declared.push(name.local().to_string()),
                    None if name.local() == XMLNS_PREFIX => declared.push(String::new()),
                    _ => names.push(name),
                }
            }
            stack.extend(element.children.iter().rev());
        }

        for name in &names {
            let Some(prefix) = name.prefix() else {
                continue;
            };
            if !namespaces.contains(prefix) && !declared.iter().any(|d| d == prefix) {
                return Err(XmlErrorKind::UnresolvedNamespacePrefix(prefix.to_string()).into());
            }
        }

        Ok(())
    }
}
