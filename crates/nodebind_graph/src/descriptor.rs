// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binding descriptors: one per logical attribute slot of a node.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structural shape of the backend attribute a slot maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Single leaf value
    Scalar,
    /// Matrix leaf
    Matrix,
    /// Indexed array (`attr[0]`, `attr[1]`, ...)
    Multi,
    /// Attribute with named child leaves, in order
    Compound(Vec<String>),
}

impl Shape {
    /// Child leaf names (empty unless compound)
    pub fn children(&self) -> &[String] {
        match self {
            Self::Compound(children) => children,
            Self::Scalar | Self::Matrix | Self::Multi => &[],
        }
    }

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Matrix => "matrix",
            Self::Multi => "multi",
            Self::Compound(_) => "compound",
        }
    }
}

/// Whether the node's attribute receives or provides data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The node's attribute is the destination
    Input,
    /// The node's attribute is the source
    Output,
}

/// A single desired binding on the target node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingDescriptor {
    /// Logical key, unique within a [`BindingSpec`]
    pub logical_name: String,
    /// Backend attribute name, relative to the node
    pub attr_path: String,
    /// Attribute shape
    pub shape: Shape,
    /// Binding direction
    pub direction: Direction,
    /// Payload
    #[serde(default)]
    pub value: Value,
}

impl BindingDescriptor {
    /// Create a descriptor with no value
    pub fn new(
        logical_name: impl Into<String>,
        attr_path: impl Into<String>,
        shape: Shape,
        direction: Direction,
    ) -> Self {
        Self {
            logical_name: logical_name.into(),
            attr_path: attr_path.into(),
            shape,
            direction,
            value: Value::Null,
        }
    }

    /// Input slot
    pub fn input(logical_name: impl Into<String>, attr_path: impl Into<String>, shape: Shape) -> Self {
        Self::new(logical_name, attr_path, shape, Direction::Input)
    }

    /// Output slot
    pub fn output(logical_name: impl Into<String>, attr_path: impl Into<String>, shape: Shape) -> Self {
        Self::new(logical_name, attr_path, shape, Direction::Output)
    }

    /// Set the payload
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Child leaf names (empty unless compound)
    pub fn children(&self) -> &[String] {
        self.shape.children()
    }
}

/// Ordered set of descriptors for one node, keyed by logical name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingSpec {
    descriptors: IndexMap<String, BindingDescriptor>,
}

impl BindingSpec {
    /// Create an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor. A descriptor with the same logical name is
    /// replaced in place, keeping its original position.
    pub fn insert(&mut self, descriptor: BindingDescriptor) -> Option<BindingDescriptor> {
        self.descriptors
            .insert(descriptor.logical_name.clone(), descriptor)
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, descriptor: BindingDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Get a descriptor by logical name
    pub fn get(&self, logical_name: &str) -> Option<&BindingDescriptor> {
        self.descriptors.get(logical_name)
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &BindingDescriptor> {
        self.descriptors.values()
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the spec is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl FromIterator<BindingDescriptor> for BindingSpec {
    fn from_iter<I: IntoIterator<Item = BindingDescriptor>>(iter: I) -> Self {
        let mut spec = Self::new();
        for descriptor in iter {
            spec.insert(descriptor);
        }
        spec
    }
}
