// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolution of binding descriptors into an ordered edge plan.
//!
//! The resolver is a pure function of the spec and the node name; it never
//! talks to a backend. Shapes and child names must already be known.
//!
//! Dispatch per descriptor, keyed by shape and direction:
//! - scalar / matrix input: one edge `value -> node.attr`
//! - multi input: one edge per present element `v[i] -> node.attr[i]`
//! - compound input: a string connects the whole compound, a sequence is
//!   zipped against the children as `v[c] -> node.child`
//! - scalar / matrix / compound output: `node.attr -> dest` per destination;
//!   compound destinations written as `prefix:s0:s1:..` fan out per child
//!   as `node.child[k] -> prefix ++ s[k]`

use crate::descriptor::{BindingDescriptor, BindingSpec, Direction, Shape};
use crate::edge::{Edge, EdgePlan};
use crate::value::{AttrRef, Endpoint, Value};

/// Delimiter separating per-child suffixes in a compound output destination
pub const CHILD_DELIMITER: char = ':';

/// A descriptor could not be turned into edges
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Unrecognized shape / direction / value combination
    #[error("binding '{key}' could not be resolved for {attr}: {reason}")]
    Unsupported {
        /// Logical key of the offending descriptor
        key: String,
        /// Full attribute path (`node.attr`)
        attr: String,
        /// What did not match
        reason: String,
    },

    /// A value was supplied for a slot the node does not have
    #[error("node has no binding slot named '{key}'")]
    UnknownSlot {
        /// The unknown logical key
        key: String,
    },
}

/// Turns a [`BindingSpec`] into an [`EdgePlan`] for one node
#[derive(Debug, Clone)]
pub struct Resolver {
    node: String,
}

impl Resolver {
    /// Create a resolver rooted at the given node
    pub fn new(node: impl Into<String>) -> Self {
        Self { node: node.into() }
    }

    /// Node edges are rooted at
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Resolve every descriptor in declaration order.
    ///
    /// Stops at the first unsupported descriptor; no partial plan is returned.
    pub fn resolve(&self, spec: &BindingSpec) -> Result<EdgePlan, ResolutionError> {
        let mut plan = EdgePlan::new(self.node.clone());

        for descriptor in spec.iter() {
            if descriptor.value.is_skip() {
                continue;
            }
            tracing::debug!(
                node = %self.node,
                key = %descriptor.logical_name,
                attr = %descriptor.attr_path,
                shape = descriptor.shape.name(),
                direction = ?descriptor.direction,
                value = ?descriptor.value,
                "binding input"
            );
            self.resolve_descriptor(descriptor, &mut plan)?;
        }

        for edge in &plan {
            tracing::debug!(node = %self.node, "{edge}");
        }

        Ok(plan)
    }

    fn resolve_descriptor(
        &self,
        descriptor: &BindingDescriptor,
        plan: &mut EdgePlan,
    ) -> Result<(), ResolutionError> {
        let attr = self.path(&descriptor.attr_path);
        let value = &descriptor.value;

        match (&descriptor.shape, descriptor.direction) {
            (Shape::Scalar | Shape::Matrix, Direction::Input) => {
                if let Some(source) = Endpoint::parse(value) {
                    plan.push(Edge::new(source, attr));
                }
            }

            (Shape::Multi, Direction::Input) => {
                let Value::List(items) = value else {
                    return Err(self.unsupported(descriptor, attr, "multi input needs a sequence"));
                };
                for (index, item) in items.iter().enumerate() {
                    if let Some(source) = Endpoint::parse(item) {
                        plan.push(Edge::new(source, format!("{attr}[{index}]")));
                    }
                }
            }

            (Shape::Compound(_), Direction::Input) => match value {
                Value::String(_) => {
                    if let Some(source) = Endpoint::parse(value) {
                        plan.push(Edge::new(source, attr));
                    }
                }
                Value::List(items) => {
                    for (child, item) in descriptor.children().iter().zip(items) {
                        if let Some(source) = Endpoint::parse(item) {
                            plan.push(Edge::new(source, self.path(child)));
                        }
                    }
                }
                _ => {
                    return Err(self.unsupported(
                        descriptor,
                        attr,
                        "compound input needs a reference or a sequence",
                    ))
                }
            },

            (Shape::Scalar | Shape::Matrix, Direction::Output) => {
                for destination in self.destinations(descriptor, &attr)? {
                    plan.push(Edge::new(AttrRef::connect(attr.clone()), destination));
                }
            }

            (Shape::Compound(children), Direction::Output) => {
                for destination in self.destinations(descriptor, &attr)? {
                    let mut segments = destination.split(CHILD_DELIMITER);
                    let prefix = segments.next().unwrap_or_default();
                    if destination.contains(CHILD_DELIMITER) {
                        for (child, suffix) in children.iter().zip(segments) {
                            plan.push(Edge::new(
                                AttrRef::connect(self.path(child)),
                                format!("{prefix}{suffix}"),
                            ));
                        }
                    } else {
                        plan.push(Edge::new(AttrRef::connect(attr.clone()), destination));
                    }
                }
            }

            (Shape::Multi, Direction::Output) => {
                return Err(self.unsupported(descriptor, attr, "multi attributes cannot be outputs"));
            }
        }

        Ok(())
    }

    /// Destination list of an output slot: a single string or a sequence
    /// of strings, absent elements skipped.
    fn destinations<'d>(
        &self,
        descriptor: &'d BindingDescriptor,
        attr: &str,
    ) -> Result<Vec<&'d str>, ResolutionError> {
        match &descriptor.value {
            Value::String(destination) => Ok(vec![destination.as_str()]),
            Value::List(items) => items
                .iter()
                .filter(|item| !matches!(item, Value::Null))
                .map(|item| match item {
                    Value::String(destination) => Ok(destination.as_str()),
                    other => Err(self.unsupported(
                        descriptor,
                        attr.to_string(),
                        &format!("output destination must be a string, got {}", other.kind()),
                    )),
                })
                .collect(),
            other => Err(self.unsupported(
                descriptor,
                attr.to_string(),
                &format!("output needs destination strings, got {}", other.kind()),
            )),
        }
    }

    fn path(&self, attr: &str) -> String {
        format!("{}.{attr}", self.node)
    }

    fn unsupported(&self, descriptor: &BindingDescriptor, attr: String, reason: &str) -> ResolutionError {
        ResolutionError::Unsupported {
            key: descriptor.logical_name.clone(),
            attr,
            reason: reason.to_string(),
        }
    }
}

/// Resolve a spec for `node` in one call
pub fn resolve(node: &str, spec: &BindingSpec) -> Result<EdgePlan, ResolutionError> {
    Resolver::new(node).resolve(spec)
}
