//! Document-scoped namespace registry.
use crate::error::{XmlErrorKind, XmlResult};
use std::collections::HashMap;

/// Well-known namespace URIs
pub mod ns {
    /// Bound to the `xml` prefix
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

    /// Bound to the `xmlns` prefix
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// The reserved prefix used to declare namespaces
pub const XMLNS_PREFIX: &str = "xmlns";

/// Mapping of namespace prefixes to URIs for a whole document.
///
/// The registry is not scoped per element: a declaration anywhere in the
/// document makes the prefix available everywhere, and a later declaration of
/// the same prefix replaces the earlier URI. The empty prefix holds the
/// default namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRegistry {
    bindings: HashMap<String, String>,
}
impl NamespaceRegistry {
    /// Creates a registry with the `xml` and `xmlns` prefixes pre-bound.
    #[must_use]
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert("xml".to_string(), ns::XML.to_string());
        bindings.insert(XMLNS_PREFIX.to_string(), ns::XMLNS.to_string());
        Self { bindings }
    }

    /// Binds `prefix` to `uri`. The empty prefix sets the default namespace.
    ///
    /// The reserved `xml` and `xmlns` prefixes cannot be rebound; attempts are ignored.
    pub fn put_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        if prefix == "xml" || prefix == XMLNS_PREFIX {
            return;
        }

        self.bindings.insert(prefix, uri.into());
    }

    /// Resolves a prefix to its URI.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::UnresolvedNamespacePrefix`] if the prefix was never registered.
    pub fn resolve(&self, prefix: &str) -> XmlResult<&str> {
        self.get(prefix)
            .ok_or_else(|| XmlErrorKind::UnresolvedNamespacePrefix(prefix.to_string()).into())
    }

    /// Returns the URI bound to a prefix, if any.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Returns the default namespace URI, if one was declared.
    #[must_use]
    pub fn default_namespace(&self) -> Option<&str> {
        self.get("")
    }

    /// True if the prefix is bound.
    #[must_use]
    pub fn contains(&self, prefix: &str) -> bool {
        self.bindings.contains_key(prefix)
    }

    /// Iterates over all `(prefix, uri)` bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}
impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
