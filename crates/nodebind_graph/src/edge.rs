// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolved edges, the unit of work handed from resolver to applier.

use crate::value::{EditMode, Endpoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single resolved edit: write or connect `source` into `destination`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Where the data comes from
    pub source: Endpoint,
    /// Destination attribute path (`node.attr`)
    pub destination: String,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: impl Into<Endpoint>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Edit semantics, derived from the source
    pub fn mode(&self) -> EditMode {
        self.source.mode()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Ordered list of edges for one node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePlan {
    /// Node the plan was resolved for
    pub node: String,
    edges: Vec<Edge>,
}

impl EdgePlan {
    /// Create an empty plan for a node
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            edges: Vec::new(),
        }
    }

    /// Append an edge
    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Edges in application order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Count edges using a given mode
    pub fn count(&self, mode: EditMode) -> usize {
        self.edges.iter().filter(|e| e.mode() == mode).count()
    }
}

impl<'a> IntoIterator for &'a EdgePlan {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

impl fmt::Display for EdgePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in &self.edges {
            writeln!(f, "{edge}")?;
        }
        Ok(())
    }
}
