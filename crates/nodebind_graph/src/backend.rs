// SPDX-License-Identifier: MIT OR Apache-2.0
//! The node-graph host the binding engine edits.
//!
//! Everything the engine needs from the host document model goes through
//! [`Backend`]. It is passed explicitly to the applier and the node builder,
//! so tests can run against [`MemoryBackend`](crate::memory::MemoryBackend).

use crate::value::Literal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data type tag of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrType {
    /// Boolean
    Bool,
    /// Integer
    Long,
    /// Floating point
    Double,
    /// String
    String,
    /// 4x4 matrix
    Matrix,
    /// Parent of named child attributes
    Compound,
}

impl AttrType {
    /// Host-style type name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Matrix => "matrix",
            Self::Compound => "compound",
        }
    }

    /// Whether a value of this type can drive an attribute of `other` type
    pub fn can_connect_to(&self, other: &AttrType) -> bool {
        if self == other {
            return true;
        }
        matches!(
            (self, other),
            (
                Self::Bool | Self::Long | Self::Double,
                Self::Bool | Self::Long | Self::Double
            )
        )
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Schema question about a node's attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrQuery {
    /// Can it be written / connected into?
    Writable,
    /// Can it be read / connected from?
    Readable,
    /// Is it an indexed array?
    Multi,
    /// Ordered child leaf names
    ListChildren,
}

/// Answer to an [`AttrQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryAnswer {
    /// Yes / no answer
    Flag(bool),
    /// List answer
    Names(Vec<String>),
}

impl QueryAnswer {
    /// Truthiness: a flag's value, or whether the list is non-empty
    pub fn is_true(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Names(names) => !names.is_empty(),
        }
    }

    /// The names of a list answer (empty for a flag)
    pub fn into_names(self) -> Vec<String> {
        match self {
            Self::Flag(_) => Vec::new(),
            Self::Names(names) => names,
        }
    }
}

/// A graph edit or schema query failed on the host side
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No node with that name
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Node kind is not known to the host
    #[error("unknown node kind: {0}")]
    UnknownNodeKind(String),

    /// Attribute path does not resolve
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    /// Value or connection type does not fit the attribute
    #[error("type mismatch on {path}: expected {expected}, got {found}")]
    TypeMismatch {
        /// Attribute path
        path: String,
        /// What the attribute holds
        expected: String,
        /// What was supplied
        found: String,
    },

    /// Attribute is locked
    #[error("attribute is locked: {0}")]
    Locked(String),

    /// Attribute cannot be written or connected into
    #[error("attribute is not writable: {0}")]
    NotWritable(String),

    /// Attribute cannot be read or connected from
    #[error("attribute is not readable: {0}")]
    NotReadable(String),

    /// Destination already has an incoming connection and force was off
    #[error("{dest} is already connected from {existing}")]
    AlreadyConnected {
        /// Destination path
        dest: String,
        /// Current source of the destination
        existing: String,
    },

    /// Disconnect of a pair that is not connected
    #[error("{source_path} is not connected to {dest}")]
    NotConnected {
        /// Source path
        source_path: String,
        /// Destination path
        dest: String,
    },

    /// Connection would feed an attribute from itself
    #[error("connecting {source_path} to {dest} would create a cycle")]
    Cycle {
        /// Source path
        source_path: String,
        /// Destination path
        dest: String,
    },
}

/// Capability surface of the node-graph host.
///
/// Paths are `node.attr`, optionally indexed (`node.attr[2]`) and/or
/// child-qualified (`node.attr[2].child`). Calls are synchronous and are
/// issued one at a time.
pub trait Backend {
    /// Create a node and return the name the host actually gave it
    fn create_node(&mut self, kind: &str, name: &str) -> Result<String, BackendError>;

    /// Connect `source` into `dest`. With `force`, an existing incoming
    /// connection on `dest` is replaced.
    fn connect_attr(&mut self, source: &str, dest: &str, force: bool) -> Result<(), BackendError>;

    /// Remove the connection from `source` into `dest`
    fn disconnect_attr(&mut self, source: &str, dest: &str) -> Result<(), BackendError>;

    /// Write a value. `type_hint` marks string and matrix payloads.
    fn set_attr(
        &mut self,
        path: &str,
        value: &Literal,
        type_hint: Option<AttrType>,
    ) -> Result<(), BackendError>;

    /// Data type of an attribute
    fn attr_type(&self, path: &str) -> Result<AttrType, BackendError>;

    /// Ask a schema question about `attr` (no index, no node prefix) on `node`
    fn query_attribute(
        &self,
        attr: &str,
        node: &str,
        query: AttrQuery,
    ) -> Result<QueryAnswer, BackendError>;

    /// All attribute names of a node, in schema order
    fn list_attributes(&self, node: &str, short_names: bool) -> Result<Vec<String>, BackendError>;

    /// Ordered child leaf names of a compound attribute (empty otherwise)
    fn attr_children(&self, attr: &str, node: &str) -> Result<Vec<String>, BackendError> {
        Ok(self
            .query_attribute(attr, node, AttrQuery::ListChildren)?
            .into_names())
    }

    /// Whether the attribute accepts writes
    fn is_writable(&self, attr: &str, node: &str) -> Result<bool, BackendError> {
        Ok(self.query_attribute(attr, node, AttrQuery::Writable)?.is_true())
    }

    /// Whether the attribute can be read
    fn is_readable(&self, attr: &str, node: &str) -> Result<bool, BackendError> {
        Ok(self.query_attribute(attr, node, AttrQuery::Readable)?.is_true())
    }

    /// Whether the attribute is an indexed array
    fn is_multi(&self, attr: &str, node: &str) -> Result<bool, BackendError> {
        Ok(self.query_attribute(attr, node, AttrQuery::Multi)?.is_true())
    }
}
