// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binding payloads and the endpoints parsed from them.
//!
//! Callers hand in loosely shaped [`Value`]s. They are parsed exactly once
//! into [`Endpoint`]s, which carry the edit semantics explicitly so that
//! nothing downstream has to inspect strings again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker suffix requesting a one-shot value transfer.
pub const TRANSFER_MARKER: char = '!';

/// Raw caller-supplied binding value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Absent value, the slot is skipped
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// String, either a literal or an attribute reference
    String(String),
    /// Sequence of values
    List(Vec<Value>),
}

impl Value {
    /// Whether this value means "no edit" (absent or an empty sequence)
    pub fn is_skip(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Short name of the value's shape, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// A value that can be written to an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// String
    String(String),
    /// Sequence of literals (matrix rows, compound children)
    List(Vec<Literal>),
}

impl Literal {
    /// Short name of the literal's type, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }

    /// Numeric view of this literal, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Self::String(_) | Self::List(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// How an edge is carried out against the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditMode {
    /// Persistent forced connection
    Connect,
    /// Literal value write
    Set,
    /// Connect then immediately disconnect, copying the value once
    Transfer,
}

/// Reference to an attribute on another node (`node.attr`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttrRef {
    /// Attribute path without any marker
    pub path: String,
    /// Either [`EditMode::Connect`] or [`EditMode::Transfer`]
    pub mode: EditMode,
}

impl AttrRef {
    /// A persistent connection source
    pub fn connect(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: EditMode::Connect,
        }
    }

    /// A one-shot transfer source
    pub fn transfer(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: EditMode::Transfer,
        }
    }

    /// Parse `node.attr` or `node.attr!`. Strings without a `.` are not references.
    pub fn parse(text: &str) -> Option<Self> {
        if !text.contains('.') {
            return None;
        }
        Some(match text.strip_suffix(TRANSFER_MARKER) {
            Some(path) => Self::transfer(path),
            None => Self::connect(text),
        })
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if self.mode == EditMode::Transfer {
            write!(f, "{TRANSFER_MARKER}")?;
        }
        Ok(())
    }
}

/// Source side of an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Endpoint {
    /// Value written directly
    Literal(Literal),
    /// Attribute connected (or transferred) from
    Reference(AttrRef),
    /// Positional payload for a destination's children (or a matrix).
    /// `None` elements are skipped.
    Sequence(Vec<Option<Endpoint>>),
}

impl Endpoint {
    /// Parse a caller value. `Null` and empty lists yield `None`, meaning
    /// "skip", at any nesting depth.
    pub fn parse(value: &Value) -> Option<Self> {
        if value.is_skip() {
            return None;
        }
        Some(match value {
            Value::Null => return None,
            Value::Bool(v) => Self::Literal(Literal::Bool(*v)),
            Value::Int(v) => Self::Literal(Literal::Int(*v)),
            Value::Float(v) => Self::Literal(Literal::Float(*v)),
            Value::String(text) => match AttrRef::parse(text) {
                Some(reference) => Self::Reference(reference),
                None => Self::Literal(Literal::String(text.clone())),
            },
            Value::List(items) => Self::Sequence(items.iter().map(Self::parse).collect()),
        })
    }

    /// Edit semantics implied by this endpoint
    pub fn mode(&self) -> EditMode {
        match self {
            Self::Reference(reference) => reference.mode,
            Self::Literal(_) | Self::Sequence(_) => EditMode::Set,
        }
    }

    /// Flatten into a literal payload. Fails if any element is a
    /// reference or is skipped.
    pub fn to_literal(&self) -> Option<Literal> {
        match self {
            Self::Literal(literal) => Some(literal.clone()),
            Self::Reference(_) => None,
            Self::Sequence(items) => items
                .iter()
                .map(|item| item.as_ref().and_then(Self::to_literal))
                .collect::<Option<Vec<_>>>()
                .map(Literal::List),
        }
    }
}

impl From<Literal> for Endpoint {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<AttrRef> for Endpoint {
    fn from(reference: AttrRef) -> Self {
        Self::Reference(reference)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Reference(reference) => write!(f, "{reference}"),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Some(endpoint) => write!(f, "{endpoint}")?,
                        None => f.write_str("None")?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}
