use crate::error::{XmlErrorKind, XmlResult};

/// The qualified name of an element or attribute, with an optional prefix:
/// `prefix:local`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    prefix: Option<String>,
    local: String,
}
impl NodeName {
    pub(crate) fn new<T: Into<String>>(prefix: Option<T>, local: T) -> Self {
        Self {
            prefix: prefix.map(Into::into),
            local: local.into(),
        }
    }

    /// Parse a qualified name such as `artifactId` or `xsi:schemaLocation`.
    ///
    /// # Errors
    /// Returns [`XmlErrorKind::InvalidArgument`] if the name is blank, contains
    /// whitespace or markup characters, or has an empty prefix or local part.
    pub fn parse(name: &str) -> XmlResult<Self> {
        if name.trim().is_empty() {
            return Err(XmlErrorKind::InvalidArgument("name must not be blank".to_string()).into());
        }

        if name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '=' | '"' | '\'' | '&'))
        {
            return Err(XmlErrorKind::InvalidArgument(format!("`{name}` is not a valid name")).into());
        }

        let parts: Vec<&str> = name.split(':').collect();
        match parts.as_slice() {
            [local] => Ok(Self::new(None, *local)),
            [prefix, local] if !prefix.is_empty() && !local.is_empty() => {
                Ok(Self::new(Some(*prefix), *local))
            }
            _ => Err(XmlErrorKind::InvalidArgument(format!("`{name}` is not a valid name")).into()),
        }
    }

    /// Compare the name with a prefix and local name.
    #[must_use]
    pub fn equals(&self, prefix: Option<&str>, local: &str) -> bool {
        self.prefix.as_deref() == prefix && self.local == local
    }

    /// Compare the name with a qualified `prefix:local` string.
    #[must_use]
    pub fn matches(&self, qualified: &str) -> bool {
        match (&self.prefix, qualified.split_once(':')) {
            (Some(prefix), Some((p, l))) => prefix == p && self.local == l,
            (None, None) => self.local == qualified,
            _ => false,
        }
    }

    /// Returns the prefix of the name.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the local portion of the name.
    #[must_use]
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Length in bytes of the qualified name as written in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefix.as_ref().map_or(0, |p| p.len() + 1) + self.local.len()
    }

    /// Always false; a parsed name has a non-empty local part.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix}:{local}", local = self.local)
        } else {
            write!(f, "{local}", local = self.local)
        }
    }
}
impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}
impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}
impl<'a> From<(xmlparser::StrSpan<'a>, xmlparser::StrSpan<'a>)> for NodeName {
    fn from((prefix, local): (xmlparser::StrSpan<'a>, xmlparser::StrSpan<'a>)) -> Self {
        let prefix = Some(prefix.as_str()).filter(|p| !p.is_empty());
        Self::new(prefix, local.as_str())
    }
}
