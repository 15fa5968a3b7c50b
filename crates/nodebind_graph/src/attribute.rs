// SPDX-License-Identifier: MIT OR Apache-2.0
//! Attribute schema definitions for node kinds.

use crate::backend::AttrType;
use crate::value::Literal;
use serde::{Deserialize, Serialize};

fn yes() -> bool {
    true
}

/// Schema of one attribute on a node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrDef {
    /// Long name
    pub name: String,
    /// Short name
    pub short_name: String,
    /// Data type; [`AttrType::Compound`] for parents of `children`
    pub attr_type: AttrType,
    /// Accepts writes and incoming connections
    #[serde(default = "yes")]
    pub writable: bool,
    /// Can be read and connected from
    #[serde(default = "yes")]
    pub readable: bool,
    /// Indexed array attribute
    #[serde(default)]
    pub multi: bool,
    /// Child attributes, in order
    #[serde(default)]
    pub children: Vec<AttrDef>,
    /// Value reported before anything is written
    #[serde(default)]
    pub default_value: Option<Literal>,
}

impl AttrDef {
    /// Create a new leaf attribute
    pub fn new(name: impl Into<String>, short_name: impl Into<String>, attr_type: AttrType) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            attr_type,
            writable: true,
            readable: true,
            multi: false,
            children: Vec::new(),
            default_value: None,
        }
    }

    /// Floating point attribute
    pub fn double(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self::new(name, short_name, AttrType::Double)
    }

    /// Integer attribute
    pub fn long(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self::new(name, short_name, AttrType::Long)
    }

    /// Boolean attribute
    pub fn boolean(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self::new(name, short_name, AttrType::Bool)
    }

    /// String attribute
    pub fn string(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self::new(name, short_name, AttrType::String)
    }

    /// Matrix attribute
    pub fn matrix(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self::new(name, short_name, AttrType::Matrix)
    }

    /// Compound attribute with the given children
    pub fn compound(
        name: impl Into<String>,
        short_name: impl Into<String>,
        children: Vec<AttrDef>,
    ) -> Self {
        let mut def = Self::new(name, short_name, AttrType::Compound);
        def.children = children;
        def
    }

    /// Compound of doubles whose children are named by suffix,
    /// e.g. `vector("translate", "t", ["X", "Y", "Z"])` gives
    /// `translateX`/`tx` and so on.
    pub fn vector<const N: usize>(
        name: impl Into<String>,
        short_name: impl Into<String>,
        suffixes: [&str; N],
    ) -> Self {
        let name = name.into();
        let short_name = short_name.into();
        let children = suffixes
            .iter()
            .map(|suffix| {
                Self::double(
                    format!("{name}{suffix}"),
                    format!("{short_name}{}", suffix.to_lowercase()),
                )
            })
            .collect();
        Self::compound(name, short_name, children)
    }

    /// Make this an indexed array
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Output-only attribute (not writable)
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Input-only attribute (not readable)
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: Literal) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Whether `name` is this attribute's long or short name
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.short_name == name
    }

    /// Whether this attribute has children
    pub fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }

    /// Get a child by long or short name
    pub fn child(&self, name: &str) -> Option<(usize, &AttrDef)> {
        self.children.iter().enumerate().find(|(_, c)| c.is_named(name))
    }

    /// Find this attribute or any descendant by long or short name
    pub fn find(&self, name: &str) -> Option<&AttrDef> {
        if self.is_named(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Value of an attribute nobody has written to
    pub fn initial_value(&self) -> Literal {
        if let Some(value) = &self.default_value {
            return value.clone();
        }
        match self.attr_type {
            AttrType::Bool => Literal::Bool(false),
            AttrType::Long => Literal::Int(0),
            AttrType::Double => Literal::Float(0.0),
            AttrType::String => Literal::String(String::new()),
            AttrType::Matrix => identity_matrix(),
            AttrType::Compound => {
                Literal::List(self.children.iter().map(Self::initial_value).collect())
            }
        }
    }

    /// Check and normalize a value written to this (leaf) attribute
    pub fn coerce(&self, value: &Literal, type_hint: Option<AttrType>) -> Option<Literal> {
        match (self.attr_type, value) {
            (AttrType::String, Literal::String(text)) if type_hint == Some(AttrType::String) => {
                Some(Literal::String(text.clone()))
            }
            (AttrType::Matrix, Literal::List(items))
                if type_hint == Some(AttrType::Matrix) && items.len() == MATRIX_LEN =>
            {
                items
                    .iter()
                    .map(|item| item.as_f64().map(Literal::Float))
                    .collect::<Option<Vec<_>>>()
                    .map(Literal::List)
            }
            (AttrType::Double, Literal::Bool(_) | Literal::Int(_) | Literal::Float(_)) => {
                value.as_f64().map(Literal::Float)
            }
            (AttrType::Long, Literal::Bool(_) | Literal::Int(_) | Literal::Float(_)) => {
                value.as_f64().map(|v| Literal::Int(v.round() as i64))
            }
            (AttrType::Bool, Literal::Bool(_) | Literal::Int(_) | Literal::Float(_)) => {
                value.as_f64().map(|v| Literal::Bool(v != 0.0))
            }
            _ => None,
        }
    }
}

/// Number of elements in a matrix payload
pub const MATRIX_LEN: usize = 16;

/// The 4x4 identity matrix as a flat literal
pub fn identity_matrix() -> Literal {
    Literal::List(
        (0..MATRIX_LEN)
            .map(|i| Literal::Float(if i % 5 == 0 { 1.0 } else { 0.0 }))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_children() {
        let translate = AttrDef::vector("translate", "t", ["X", "Y", "Z"]);
        let names: Vec<_> = translate.children.iter().map(|c| c.short_name.as_str()).collect();
        assert_eq!(names, ["tx", "ty", "tz"]);
        assert_eq!(translate.child("translateY").map(|(i, _)| i), Some(1));
        assert!(translate.find("tz").is_some());
        assert_eq!(
            translate.initial_value(),
            Literal::List(vec![Literal::Float(0.0); 3])
        );
    }

    #[test]
    fn test_coercion() {
        let double = AttrDef::double("weight", "w");
        assert_eq!(double.coerce(&Literal::Int(2), None), Some(Literal::Float(2.0)));
        assert_eq!(double.coerce(&Literal::String("2".into()), None), None);

        let text = AttrDef::string("label", "lb");
        assert_eq!(text.coerce(&Literal::String("a".into()), None), None);
        assert!(text.coerce(&Literal::String("a".into()), Some(AttrType::String)).is_some());

        let matrix = AttrDef::matrix("offset", "off");
        assert_eq!(matrix.coerce(&identity_matrix(), Some(AttrType::Matrix)), Some(identity_matrix()));
        assert_eq!(matrix.coerce(&Literal::List(vec![Literal::Int(1)]), Some(AttrType::Matrix)), None);
    }
}
