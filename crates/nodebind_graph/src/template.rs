// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binding slots derived from a live node's schema.
//!
//! Every writable attribute becomes an input slot keyed by its short name,
//! every readable non-array attribute an output slot keyed `<short>_dest`.

use crate::backend::{AttrType, Backend, BackendError};
use crate::descriptor::{BindingDescriptor, BindingSpec, Direction, Shape};
use crate::resolver::ResolutionError;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix of output slot names
pub const OUTPUT_SUFFIX: &str = "_dest";

/// A bindable slot of a node, without a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Logical key callers use
    pub logical_name: String,
    /// Attribute long name
    pub attr_path: String,
    /// Attribute shape
    pub shape: Shape,
    /// Binding direction
    pub direction: Direction,
}

/// All bindable slots of one node, in schema order (inputs first)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeTemplate {
    slots: IndexMap<String, Slot>,
}

impl NodeTemplate {
    /// Read the slots of `node` from the backend.
    ///
    /// Attributes whose schema queries fail are left out.
    pub fn introspect<B: Backend + ?Sized>(backend: &B, node: &str) -> Result<Self, BackendError> {
        let long_names = backend.list_attributes(node, false)?;
        let short_names = backend.list_attributes(node, true)?;
        let names: Vec<_> = long_names
            .iter()
            .zip(&short_names)
            .filter(|(long, _)| !long.contains('.'))
            .collect();

        let mut template = Self::default();

        for (long, short) in &names {
            match input_shape(backend, node, long) {
                Ok(Some(shape)) => template.insert(Slot {
                    logical_name: short.to_string(),
                    attr_path: long.to_string(),
                    shape,
                    direction: Direction::Input,
                }),
                Ok(None) => {}
                Err(err) => tracing::debug!(node, attr = %long, "skipping input slot: {err}"),
            }
        }

        for (long, short) in &names {
            match output_shape(backend, node, long) {
                Ok(Some(shape)) => template.insert(Slot {
                    logical_name: format!("{short}{OUTPUT_SUFFIX}"),
                    attr_path: long.to_string(),
                    shape,
                    direction: Direction::Output,
                }),
                Ok(None) => {}
                Err(err) => tracing::debug!(node, attr = %long, "skipping output slot: {err}"),
            }
        }

        Ok(template)
    }

    /// Add a slot
    pub fn insert(&mut self, slot: Slot) {
        self.slots.insert(slot.logical_name.clone(), slot);
    }

    /// Get a slot by logical name
    pub fn get(&self, logical_name: &str) -> Option<&Slot> {
        self.slots.get(logical_name)
    }

    /// All slots in order
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.values()
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the node has no bindable slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Attach caller values to the slots. Slots without a value get
    /// [`Value::Null`]; keys that match no slot are rejected.
    pub fn bind<I, K, V>(&self, values: I) -> Result<BindingSpec, ResolutionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut supplied = IndexMap::new();
        for (key, value) in values {
            let key = key.into();
            if !self.slots.contains_key(&key) {
                return Err(ResolutionError::UnknownSlot { key });
            }
            supplied.insert(key, value.into());
        }

        Ok(self
            .slots()
            .map(|slot| BindingDescriptor {
                logical_name: slot.logical_name.clone(),
                attr_path: slot.attr_path.clone(),
                shape: slot.shape.clone(),
                direction: slot.direction,
                value: supplied.swap_remove(&slot.logical_name).unwrap_or_default(),
            })
            .collect())
    }
}

impl fmt::Display for NodeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in self.slots() {
            let direction = match slot.direction {
                Direction::Input => "in",
                Direction::Output => "out",
            };
            write!(f, "{:<12} {:<4} {:<9} {}", slot.logical_name, direction, slot.shape.name(), slot.attr_path)?;
            if let Shape::Compound(children) = &slot.shape {
                write!(f, " ({})", children.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn input_shape<B: Backend + ?Sized>(
    backend: &B,
    node: &str,
    attr: &str,
) -> Result<Option<Shape>, BackendError> {
    if !backend.is_writable(attr, node)? {
        return Ok(None);
    }
    if backend.is_multi(attr, node)? {
        return Ok(Some(Shape::Multi));
    }
    if backend.attr_type(&format!("{node}.{attr}"))? == AttrType::Matrix {
        return Ok(Some(Shape::Matrix));
    }
    let children = backend.attr_children(attr, node)?;
    Ok(Some(if children.is_empty() {
        Shape::Scalar
    } else {
        Shape::Compound(children)
    }))
}

fn output_shape<B: Backend + ?Sized>(
    backend: &B,
    node: &str,
    attr: &str,
) -> Result<Option<Shape>, BackendError> {
    if !backend.is_readable(attr, node)? || backend.is_multi(attr, node)? {
        return Ok(None);
    }
    let children = backend.attr_children(attr, node)?;
    if !children.is_empty() {
        return Ok(Some(Shape::Compound(children)));
    }
    if backend.attr_type(&format!("{node}.{attr}"))? == AttrType::Matrix {
        return Ok(Some(Shape::Matrix));
    }
    Ok(Some(Shape::Scalar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttrDef;
    use crate::memory::MemoryBackend;
    use crate::node::NodeKind;

    fn backend() -> MemoryBackend {
        let kind = NodeKind::new("multMatrix")
            .with_attr(AttrDef::matrix("matrixIn", "i").multi())
            .with_attr(AttrDef::matrix("matrixSum", "o").read_only())
            .with_attr(AttrDef::vector("color", "c", ["R", "G", "B"]))
            .with_attr(AttrDef::double("envelope", "en").write_only());
        let mut backend = MemoryBackend::new([kind].into_iter().collect());
        backend.create_node("multMatrix", "mm").unwrap();
        backend
    }

    #[test]
    fn test_introspection_slots() {
        let template = NodeTemplate::introspect(&backend(), "mm").unwrap();
        let summary: Vec<_> = template
            .slots()
            .map(|s| (s.logical_name.as_str(), s.shape.name(), s.direction))
            .collect();

        assert_eq!(
            summary,
            [
                ("i", "multi", Direction::Input),
                ("c", "compound", Direction::Input),
                ("cr", "scalar", Direction::Input),
                ("cg", "scalar", Direction::Input),
                ("cb", "scalar", Direction::Input),
                ("en", "scalar", Direction::Input),
                ("o_dest", "matrix", Direction::Output),
                ("c_dest", "compound", Direction::Output),
                ("cr_dest", "scalar", Direction::Output),
                ("cg_dest", "scalar", Direction::Output),
                ("cb_dest", "scalar", Direction::Output),
            ]
        );
        assert_eq!(
            template.get("c").unwrap().shape.children(),
            ["colorR", "colorG", "colorB"]
        );
    }

    #[test]
    fn test_bind_fills_missing_with_null() {
        let template = NodeTemplate::introspect(&backend(), "mm").unwrap();
        let spec = template
            .bind([("en", Value::from(0.5)), ("o_dest", Value::from(vec!["x.m"]))])
            .unwrap();

        assert_eq!(spec.len(), template.len());
        assert_eq!(spec.get("en").unwrap().value, Value::Float(0.5));
        assert_eq!(spec.get("i").unwrap().value, Value::Null);
        assert_eq!(spec.get("o_dest").unwrap().attr_path, "matrixSum");
    }

    #[test]
    fn test_bind_rejects_unknown_keys() {
        let template = NodeTemplate::introspect(&backend(), "mm").unwrap();
        let err = template.bind([("bogus", 1)]).unwrap_err();
        assert_eq!(err, ResolutionError::UnknownSlot { key: "bogus".into() });
    }

    #[test]
    fn test_display_lists_slots() {
        let template = NodeTemplate::introspect(&backend(), "mm").unwrap();
        let text = template.to_string();
        assert_eq!(text.lines().count(), template.len());
        assert!(text.contains("(colorR, colorG, colorB)"));
    }
}
