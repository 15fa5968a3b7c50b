// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node kinds and node instances of the in-memory graph.

use crate::attribute::AttrDef;
use crate::value::Literal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Node kind definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeKind {
    /// Unique kind name
    pub name: String,
    /// Top-level attributes, in schema order
    pub attributes: Vec<AttrDef>,
}

impl NodeKind {
    /// Create a kind with no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attr(mut self, attr: AttrDef) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Get a top-level attribute by long or short name
    pub fn attribute(&self, name: &str) -> Option<&AttrDef> {
        self.attributes.iter().find(|a| a.is_named(name))
    }

    /// Find any attribute, including children, by long or short name
    pub fn find(&self, name: &str) -> Option<&AttrDef> {
        self.attributes.iter().find_map(|a| a.find(name))
    }

    /// Find a top-level non-array compound owning a child with this name.
    /// Such children are addressable straight from the node.
    pub fn parent_of(&self, child: &str) -> Option<(&AttrDef, &AttrDef)> {
        self.attributes
            .iter()
            .filter(|a| !a.multi)
            .find_map(|parent| parent.child(child).map(|(_, c)| (parent, c)))
    }

    /// Attribute names in schema order. Children of compounds follow their
    /// parent; children of array compounds are reported dotted
    /// (`parent.child`).
    pub fn attribute_names(&self, short_names: bool) -> Vec<String> {
        let pick = |a: &AttrDef| {
            if short_names {
                a.short_name.clone()
            } else {
                a.name.clone()
            }
        };

        let mut names = Vec::new();
        for attr in &self.attributes {
            names.push(pick(attr));
            for child in &attr.children {
                if attr.multi {
                    names.push(format!("{}.{}", pick(attr), pick(child)));
                } else {
                    names.push(pick(child));
                }
            }
        }
        names
    }
}

/// Registry of available node kinds
#[derive(Debug, Clone, Default)]
pub struct NodeKindRegistry {
    kinds: IndexMap<String, NodeKind>,
}

impl NodeKindRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node kind, replacing one with the same name
    pub fn register(&mut self, kind: NodeKind) {
        self.kinds.insert(kind.name.clone(), kind);
    }

    /// Get a node kind by name
    pub fn get(&self, name: &str) -> Option<&NodeKind> {
        self.kinds.get(name)
    }

    /// All registered kinds
    pub fn kinds(&self) -> impl Iterator<Item = &NodeKind> {
        self.kinds.values()
    }

    /// Parse a RON list of node kinds
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        let kinds: Vec<NodeKind> = ron::from_str(text)?;
        Ok(kinds.into_iter().collect())
    }
}

impl FromIterator<NodeKind> for NodeKindRegistry {
    fn from_iter<I: IntoIterator<Item = NodeKind>>(iter: I) -> Self {
        let mut registry = Self::new();
        for kind in iter {
            registry.register(kind);
        }
        registry
    }
}

/// A node instance in the in-memory graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique node name
    pub name: String,
    /// Node kind name
    pub kind: String,
    /// Written leaf values by canonical attribute key
    pub values: IndexMap<String, Literal>,
    /// Locked canonical attribute keys
    pub locked: HashSet<String>,
}

impl Node {
    /// Create a node with nothing written yet
    pub fn new(name: impl Into<String>, kind: &NodeKind) -> Self {
        Self {
            name: name.into(),
            kind: kind.name.clone(),
            values: IndexMap::new(),
            locked: HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> NodeKind {
        NodeKind::new("transform")
            .with_attr(AttrDef::vector("translate", "t", ["X", "Y", "Z"]))
            .with_attr(AttrDef::matrix("worldMatrix", "wm").read_only())
            .with_attr(
                AttrDef::compound("input", "i", vec![AttrDef::double("inputValue", "iv")]).multi(),
            )
    }

    #[test]
    fn test_attribute_names() {
        let kind = transform();
        assert_eq!(
            kind.attribute_names(false),
            [
                "translate",
                "translateX",
                "translateY",
                "translateZ",
                "worldMatrix",
                "input",
                "input.inputValue",
            ]
        );
        assert_eq!(kind.attribute_names(true)[..2], ["t", "tx"]);
    }

    #[test]
    fn test_parent_lookup_skips_arrays() {
        let kind = transform();
        assert_eq!(kind.parent_of("ty").map(|(p, _)| p.name.as_str()), Some("translate"));
        assert!(kind.parent_of("inputValue").is_none());
        assert!(kind.find("iv").is_some());
    }

    #[test]
    fn test_registry_from_ron() {
        let registry = NodeKindRegistry::from_ron(
            r#"[
                (
                    name: "addDouble",
                    attributes: [
                        (name: "input1", short_name: "i1", attr_type: Double),
                        (name: "output", short_name: "o", attr_type: Double, writable: false),
                    ],
                ),
            ]"#,
        )
        .unwrap();

        let kind = registry.get("addDouble").unwrap();
        assert_eq!(kind.attributes.len(), 2);
        assert!(!kind.attribute("o").unwrap().writable);
        assert!(kind.attribute("input1").unwrap().readable);
    }
}
