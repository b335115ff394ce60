#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Structured text node tree used for map metadata.
//!
//! A document is an ordered list of [`MarkupNode`] values. Each line holds a
//! `Key: Value` pair, nesting is expressed with leading tabs, and lines whose
//! first visible character is `#` are comments. The key is everything before
//! the first colon, so keys may contain spaces and commas.
//!
//! Node order is preserved through parsing and writing. Keyed access is a
//! view derived on demand with [`nodes_dict`], which rejects duplicate keys.

use std::{collections::HashMap, fmt::Write as _};

use thiserror::Error;

const INDENT: char = '\t';
const SEPARATOR: char = ':';
const COMMENT: char = '#';
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Single node of the structured text tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkupNode {
    /// Text before the separator.
    pub key: String,
    /// Text after the separator, absent when empty.
    pub value: Option<String>,
    /// Nested nodes in document order.
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// Creates a leaf node without a value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Creates a leaf node carrying a value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Creates a value-less node wrapping the provided children.
    #[must_use]
    pub fn section(key: impl Into<String>, children: Vec<MarkupNode>) -> Self {
        Self {
            key: key.into(),
            value: None,
            children,
        }
    }

    /// Replaces the node's children, returning the node for chaining.
    #[must_use]
    pub fn with_children(mut self, children: Vec<MarkupNode>) -> Self {
        self.children = children;
        self
    }

    /// Value of the node as a string slice.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// First child carrying the provided key.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&MarkupNode> {
        self.children.iter().find(|child| child.key == key)
    }

    /// Keyed view over the node's children.
    pub fn nodes_dict(&self) -> Result<HashMap<&str, &MarkupNode>, MarkupError> {
        nodes_dict(&self.children)
    }
}

/// Builds a keyed view over an ordered node list.
///
/// Fails with [`MarkupError::DuplicateKey`] when two nodes share a key.
pub fn nodes_dict(nodes: &[MarkupNode]) -> Result<HashMap<&str, &MarkupNode>, MarkupError> {
    let mut dict = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if dict.insert(node.key.as_str(), node).is_some() {
            return Err(MarkupError::DuplicateKey(node.key.clone()));
        }
    }
    Ok(dict)
}

/// Errors raised while reading structured text.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The payload is not valid UTF-8.
    #[error("markup is not valid utf-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// A non-comment line does not contain the key separator.
    #[error("line {line}: expected `key: value`")]
    MissingSeparator {
        /// One-based line number.
        line: usize,
    },
    /// A line is nested deeper than its predecessor allows.
    #[error("line {line}: indentation depth {depth} exceeds the allowed {allowed}")]
    UnexpectedIndent {
        /// One-based line number.
        line: usize,
        /// Depth found on the line.
        depth: usize,
        /// Deepest depth permitted at this point.
        allowed: usize,
    },
    /// Two sibling nodes share the same key where unique keys are required.
    #[error("duplicate key `{0}`")]
    DuplicateKey(String),
}

/// Parses structured text from raw bytes.
pub fn parse_bytes(bytes: &[u8]) -> Result<Vec<MarkupNode>, MarkupError> {
    parse_str(std::str::from_utf8(bytes)?)
}

/// Parses structured text into its top-level nodes.
pub fn parse_str(text: &str) -> Result<Vec<MarkupNode>, MarkupError> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut roots = Vec::new();
    let mut open: Vec<MarkupNode> = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
            continue;
        }

        let depth = raw.chars().take_while(|c| *c == INDENT).count();
        if depth > open.len() {
            return Err(MarkupError::UnexpectedIndent {
                line,
                depth,
                allowed: open.len(),
            });
        }

        let (key, value) = trimmed
            .split_once(SEPARATOR)
            .ok_or(MarkupError::MissingSeparator { line })?;
        let value = value.trim();

        while open.len() > depth {
            close_innermost(&mut open, &mut roots);
        }
        open.push(MarkupNode {
            key: key.trim().to_owned(),
            value: (!value.is_empty()).then(|| value.to_owned()),
            children: Vec::new(),
        });
    }

    while !open.is_empty() {
        close_innermost(&mut open, &mut roots);
    }

    Ok(roots)
}

fn close_innermost(open: &mut Vec<MarkupNode>, roots: &mut Vec<MarkupNode>) {
    if let Some(done) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Serialises nodes into structured text.
#[must_use]
pub fn write_string(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, 0);
    }
    out
}

fn write_node(out: &mut String, node: &MarkupNode, depth: usize) {
    out.extend(std::iter::repeat(INDENT).take(depth));
    out.push_str(&node.key);
    out.push(SEPARATOR);
    if let Some(value) = node.value.as_deref().filter(|value| !value.is_empty()) {
        let _ = write!(out, " {value}");
    }
    out.push('\n');

    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}
