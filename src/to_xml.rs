//! XML formatting of pending elements, and entity escaping
//!
//! Used by the mutation operations to produce the bytes spliced into a document.
use crate::{
    error::{XmlErrorKind, XmlResult},
    pending::NewElement,
};
use htmlentity::entity::ICodedDataTrait;
use htmlentity::entity::{CharacterSet, EncodeType, decode, encode};
use std::fmt::Write;

/// Flatten a pending element as formatted XML.
///
/// The element itself is not indented: its open tag is written at the current
/// position, and `depth` is the level it will sit at in the document. Children
/// go on their own lines one level deeper, and the close tag of an element with
/// children is indented to `depth`.
///
/// # Errors
/// Fails if a name or value cannot be escaped.
pub fn write_element(element: &NewElement, indent: &str, depth: usize) -> XmlResult<String> {
    let mut out = String::new();

    let mut stack = vec![NodeTask::Open(element, depth, false)];
    while let Some(task) = stack.pop() {
        match task {
            NodeTask::Close(name, level) => {
                let tab = indent.repeat(level);
                write!(out, "\n{tab}</{name}>").map_err(fmt_error)?;
            }

            NodeTask::Open(node, level, newline) => {
                if newline {
                    let tab = indent.repeat(level);
                    write!(out, "\n{tab}").map_err(fmt_error)?;
                }

                write!(out, "<{}", node.name()).map_err(fmt_error)?;
                for attr in node.attributes() {
                    let value = encode_entities(attr.value())?;
                    write!(out, r#" {}="{value}""#, attr.name()).map_err(fmt_error)?;
                }

                if node.is_void() {
                    out.push_str("/>");
                    continue;
                }

                out.push('>');
                if let Some(text) = node.text() {
                    out.push_str(&encode_entities(text)?);
                }

                if node.children().is_empty() {
                    write!(out, "</{}>", node.name()).map_err(fmt_error)?;
                    continue;
                }

                stack.push(NodeTask::Close(node.name(), level));
                for child in node.children().iter().rev() {
                    stack.push(NodeTask::Open(child, level + 1, true));
                }
            }
        }
    }

    Ok(out)
}

/// Escape text or an attribute value for writing into the buffer.
///
/// # Errors
/// Fails if the escaped bytes are not valid UTF-8.
pub fn encode_entities(input: &str) -> XmlResult<String> {
    encode(input.as_bytes(), &EncodeType::NamedOrHex, &CharacterSet::Html)
        .to_string()
        .map_err(|e| XmlErrorKind::InvalidArgument(e.to_string()).into())
}

/// Entities predefined by XML; other named references are left as written.
const XML_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

/// Resolve character references and the predefined entity references in raw source text.
pub(crate) fn decode_entities(input: &str) -> Result<String, String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let name = rest[1..].split(';').next().unwrap_or_default();
        let semi = name.len() + 1;
        if semi >= rest.len() || name.is_empty() || name.contains(|c: char| c == '&' || c.is_whitespace()) {
            out.push('&');
            rest = &rest[1..];
            continue;
        }

        let reference = &rest[..=semi];
        if name.starts_with('#') || XML_ENTITIES.contains(&name) {
            let decoded = decode(reference.as_bytes()).to_string().map_err(|e| e.to_string())?;
            out.push_str(&decoded);
        } else {
            out.push_str(reference);
        }
        rest = &rest[semi + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn fmt_error(e: std::fmt::Error) -> crate::error::XmlError {
    XmlErrorKind::InvalidArgument(e.to_string()).into()
}

enum NodeTask<'a> {
    /// Element, its depth, and whether it starts on a new line
    Open(&'a NewElement, usize, bool),
    Close(&'a str, usize),
}
