//! # xmledit
//!
//! A format-preserving XML editor.
//!
//! A [`Document`] keeps the exact bytes it was parsed from, and indexes every element,
//! attribute and text run by the byte [`Segment`] it occupies. Queries walk the index;
//! edits splice new bytes into the buffer and shift the segments that follow.
//! Bytes outside an edit are never touched: comments, whitespace, quoting style,
//! entity references and the prolog all survive a parse/edit/serialize cycle.
//!
//! ```rust
//! use xmledit::{Document, NewElement};
//!
//! let src = "<project>\n    <version>1.0</version>\n</project>";
//! let mut doc = Document::parse_str(src).unwrap();
//!
//! doc.update_text("/project/version", "2.0").unwrap();
//! let root = doc.root().id();
//! doc.append_child(root, &NewElement::with_text("name", "demo")).unwrap();
//!
//! assert_eq!(
//!     doc.as_str(),
//!     "<project>\n    <version>2.0</version>\n    <name>demo</name>\n</project>"
//! );
//! ```
//!
//! Things to note:
//! - Handles are [`ElementId`] and [`AttributeId`]. A handle to a removed node fails with
//!   [`XmlErrorKind::DetachedNode`] instead of pointing at something else.
//! - Namespaces are tracked per document, not per element. See [`NamespaceRegistry`].
//! - Paths use a small XPath subset by default; see [`LocationPath`]. Another engine can be
//!   plugged in with [`Document::with_evaluator`].
#![warn(missing_docs)]

mod arena;
mod indexer;
mod mutation;

mod document;
pub use document::*;

mod error;
pub use error::{ErrorContext, XmlError, XmlErrorKind, XmlResult};

mod segment;
pub use segment::*;

pub mod namespace;
pub use namespace::NamespaceRegistry;

pub mod node;
pub use node::*;

mod options;
pub use options::*;

mod pending;
pub use pending::*;

mod query;
pub use query::*;

pub mod path;
pub use path::{LocationPath, LocationPathEvaluator};

mod to_xml;
pub use to_xml::{encode_entities, write_element};
