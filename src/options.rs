//! Configuration for content written into a document.

/// Default indentation unit for inserted content.
pub const DEFAULT_INDENT: &str = "    ";

/// Options controlling how inserted content is serialized.
///
/// Options never cause existing bytes to be rewritten; they only shape the
/// bytes of new elements spliced in by the mutation operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    /// One level of indentation. Repeated once per level of depth, where the
    /// children of the root are at depth 1.
    pub indent: String,
}
impl TreeOptions {
    /// Set the indentation unit, eg. `"\t"` or `"  "`.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Indentation for an element at the given depth.
    #[must_use]
    pub fn indent_for(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }
}
impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_for() {
        let options = TreeOptions::default();
        assert_eq!(options.indent_for(0), "");
        assert_eq!(options.indent_for(2), "        ");

        let options = options.with_indent("\t");
        assert_eq!(options.indent_for(3), "\t\t\t");
    }
}
