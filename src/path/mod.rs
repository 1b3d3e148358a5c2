//! The built-in path evaluator
//!
//! A small subset of XPath location paths:
//! - absolute (`/project/version`) and relative (`project/version`) paths; both start above the root element
//! - `//` descendant-or-self, `*`, `.`, `..`
//! - attribute steps `@name` and `@*`, and `text()`, as the last step only
//! - predicates: `[2]`, `[last()]`, `[name]`, `[@name]`, `[text()]`,
//!   `[name='v']`, `[@name!='v']`, `[text()='v']`, combined with `and`, `or` and parentheses
//!
//! Names compare against the qualified name as written in the document.
use crate::{
    error::{XmlErrorKind, XmlResult},
    query::{NavigableTree, PathEvaluator, QueryMatch},
};

mod eval;
mod lexer;
mod parser;

pub use parser::LocationPath;

impl LocationPath {
    /// Parse a path expression.
    ///
    /// # Errors
    /// Fails with [`XmlErrorKind::InvalidPathExpression`] on syntax this evaluator does not support.
    pub fn parse(expr: &str) -> XmlResult<Self> {
        parser::Parser::new(expr)
            .parse()
            .map_err(|e| XmlErrorKind::InvalidPathExpression(format!("`{expr}`: {e}")).into())
    }

    /// Evaluate the path against a tree. Matches are in document order, without duplicates.
    #[must_use]
    pub fn evaluate(&self, tree: &dyn NavigableTree) -> Vec<QueryMatch> {
        eval::evaluate(self, tree)
    }

    /// True if the path starts with `/` or `//`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }
}
impl std::str::FromStr for LocationPath {
    type Err = crate::XmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The default [`PathEvaluator`], backed by [`LocationPath`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LocationPathEvaluator;
impl PathEvaluator for LocationPathEvaluator {
    fn evaluate(&self, tree: &dyn NavigableTree, expr: &str) -> XmlResult<Vec<QueryMatch>> {
        let path = LocationPath::parse(expr)?;
        let matches = path.evaluate(tree);
        log::trace!("`{expr}` matched {} nodes", matches.len());
        Ok(matches)
    }
}
