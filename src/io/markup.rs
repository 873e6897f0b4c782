//! Minimal XML tree and serializer for synthetic export documents.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

/// An element node: tag, ordered attributes, optional text and children.
///
/// # Examples
///
/// ```
/// use usage_synth::io::markup::Element;
///
/// let el = Element::new("user")
///     .attr("display_value", "Ann & Co")
///     .text("u1");
/// assert_eq!(el.to_xml(), "<user display_value=\"Ann &amp; Co\">u1</user>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Adds an attribute, keeping insertion order.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Sets the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child and returns `self` for chaining.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child in place.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find_map(|(k, v)| if k == name { Some(v.as_str()) } else { None })
    }

    /// First direct child with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Serializes the element and its subtree on one line, without a declaration.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self, None, 0);
        out
    }
}

/// Serializes a full document: declaration followed by `root`.
///
/// With `indent`, children are placed on their own lines and indented by that
/// many spaces per level.
pub fn to_xml_string(root: &Element, indent: Option<usize>) -> String {
    let mut out = String::from(DECLARATION);
    out.push('\n');
    write_element(&mut out, root, indent, 0);
    out.push('\n');
    out
}

/// Writes a full document to `path` in one write.
///
/// # Errors
///
/// Returns [`crate::error::Error::Io`] if the file cannot be written.
pub fn write_xml_file(root: &Element, path: &Path, indent: Option<usize>) -> Result<()> {
    let xml = to_xml_string(root, indent);
    fs::write(path, xml.as_bytes())?;
    info!(path = %path.display(), records = root.children.len(), "document written");
    Ok(())
}

fn write_element(out: &mut String, el: &Element, indent: Option<usize>, depth: usize) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attributes {
        let _ = write!(out, " {name}=\"{}\"", escape(value));
    }

    if el.text.is_none() && el.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    if let Some(text) = &el.text {
        out.push_str(&escape(text));
    }
    for child in &el.children {
        if let Some(width) = indent {
            out.push('\n');
            out.push_str(&" ".repeat(width * (depth + 1)));
        }
        write_element(out, child, indent, depth + 1);
    }
    if let (Some(width), false) = (indent, el.children.is_empty()) {
        out.push('\n');
        out.push_str(&" ".repeat(width * depth));
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

/// Escapes the five XML special characters.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
