// SPDX-License-Identifier: MIT OR Apache-2.0
//! Create a node and bind its attributes in one step.

use crate::applier::{Applier, ApplySummary};
use crate::backend::{Backend, BackendError};
use crate::edge::EdgePlan;
use crate::resolver::{ResolutionError, Resolver};
use crate::template::NodeTemplate;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error while creating and binding a node
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// The bindings could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// The host rejected an edit or query
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Outcome of [`NodeBuilder::build`]
#[derive(Debug, Clone)]
pub struct BuiltNode {
    /// Name the backend gave the node
    pub name: String,
    /// Edges that were applied
    pub plan: EdgePlan,
    /// What the applier did
    pub summary: ApplySummary,
}

/// Declarative node construction: kind, optional name, slot values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeBuilder {
    /// Node kind to create
    pub kind: String,
    /// Requested node name; empty lets the backend choose
    #[serde(default)]
    pub name: String,
    /// Slot values by logical name, in application order
    #[serde(default)]
    pub values: IndexMap<String, Value>,
}

impl NodeBuilder {
    /// Start building a node of the given kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Request a node name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Supply a value for a slot
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Create the node and resolve its bindings without applying them
    pub fn plan<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<EdgePlan, BindError> {
        let name = backend.create_node(&self.kind, &self.name)?;
        tracing::info!(kind = %self.kind, node = %name, "Created node");

        let template = NodeTemplate::introspect(&*backend, &name)?;
        let spec = template.bind(self.values.iter().map(|(k, v)| (k.clone(), v.clone())))?;
        Ok(Resolver::new(name).resolve(&spec)?)
    }

    /// Create the node, resolve and apply its bindings
    pub fn build<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<BuiltNode, BindError> {
        let plan = self.plan(backend)?;
        let summary = Applier::new(backend).apply(&plan)?;
        Ok(BuiltNode {
            name: plan.node.clone(),
            plan,
            summary,
        })
    }
}
