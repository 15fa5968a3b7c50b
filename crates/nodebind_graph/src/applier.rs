// SPDX-License-Identifier: MIT OR Apache-2.0
//! Execution of an edge plan against a [`Backend`].
//!
//! Edges run one at a time, in order. The first backend failure aborts the
//! run; edits already made stay made.

use crate::backend::{AttrType, Backend, BackendError};
use crate::edge::{Edge, EdgePlan};
use crate::value::{AttrRef, EditMode, Endpoint, Literal};

/// Counts of what an apply run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Persistent connections made
    pub connected: usize,
    /// Values written
    pub set: usize,
    /// One-shot transfers performed
    pub transferred: usize,
    /// Sequence elements skipped because they were absent
    pub skipped: usize,
}

impl ApplySummary {
    /// Total number of edits issued
    pub fn edits(&self) -> usize {
        self.connected + self.set + self.transferred
    }
}

/// Applies edges to a backend
pub struct Applier<'a, B: Backend + ?Sized> {
    backend: &'a mut B,
    summary: ApplySummary,
}

impl<'a, B: Backend + ?Sized> Applier<'a, B> {
    /// Create an applier over a backend
    pub fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            summary: ApplySummary::default(),
        }
    }

    /// Apply every edge of a plan in order
    pub fn apply(mut self, plan: &EdgePlan) -> Result<ApplySummary, BackendError> {
        for edge in plan {
            self.apply_edge(edge)?;
        }
        tracing::debug!(
            node = %plan.node,
            connected = self.summary.connected,
            set = self.summary.set,
            transferred = self.summary.transferred,
            skipped = self.summary.skipped,
            "applied bindings"
        );
        Ok(self.summary)
    }

    /// Apply a single edge
    pub fn apply_edge(&mut self, edge: &Edge) -> Result<(), BackendError> {
        self.apply_endpoint(&edge.source, &edge.destination)
    }

    /// What has been done so far
    pub fn summary(&self) -> ApplySummary {
        self.summary
    }

    fn apply_endpoint(&mut self, source: &Endpoint, dest: &str) -> Result<(), BackendError> {
        match source {
            Endpoint::Literal(literal) => self.set(dest, literal),
            Endpoint::Reference(reference) => self.link(reference, dest),
            Endpoint::Sequence(items) => self.fan_out(source, items, dest),
        }
    }

    fn set(&mut self, dest: &str, literal: &Literal) -> Result<(), BackendError> {
        let hint = matches!(literal, Literal::String(_)).then_some(AttrType::String);
        self.backend.set_attr(dest, literal, hint)?;
        self.summary.set += 1;
        Ok(())
    }

    fn link(&mut self, reference: &AttrRef, dest: &str) -> Result<(), BackendError> {
        self.backend.connect_attr(&reference.path, dest, true)?;
        if reference.mode == EditMode::Transfer {
            self.backend.disconnect_attr(&reference.path, dest)?;
            self.summary.transferred += 1;
        } else {
            self.summary.connected += 1;
        }
        Ok(())
    }

    /// A sequence is a matrix payload when the destination is matrix-typed,
    /// otherwise it is spread positionally over the destination's children.
    fn fan_out(
        &mut self,
        source: &Endpoint,
        items: &[Option<Endpoint>],
        dest: &str,
    ) -> Result<(), BackendError> {
        let mismatch = |expected: &str| BackendError::TypeMismatch {
            path: dest.to_string(),
            expected: expected.to_string(),
            found: source.to_string(),
        };

        if self.backend.attr_type(dest)? == AttrType::Matrix {
            let payload = source.to_literal().ok_or_else(|| mismatch("matrix"))?;
            self.backend.set_attr(dest, &payload, Some(AttrType::Matrix))?;
            self.summary.set += 1;
            return Ok(());
        }

        let (node, attr) = dest
            .split_once('.')
            .ok_or_else(|| BackendError::AttributeNotFound(dest.to_string()))?;
        let children = self.backend.attr_children(base_attr_name(attr), node)?;

        if children.is_empty() {
            let payload = source.to_literal().ok_or_else(|| mismatch("literal values"))?;
            self.backend.set_attr(dest, &payload, None)?;
            self.summary.set += 1;
            return Ok(());
        }

        for (child, item) in children.iter().zip(items) {
            match item {
                Some(endpoint) => self.apply_endpoint(endpoint, &format!("{dest}.{child}"))?,
                None => self.summary.skipped += 1,
            }
        }
        Ok(())
    }
}

/// Schema name of the last path segment: `input[3]` -> `input`,
/// `a[0].b[1]` -> `b`
pub fn base_attr_name(attr: &str) -> &str {
    let last = attr.rsplit('.').next().unwrap_or(attr);
    match last.strip_suffix(']').and_then(|s| s.rsplit_once('[')) {
        Some((name, index)) if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => last,
    }
}

/// Apply a plan to a backend in one call
pub fn apply<B: Backend + ?Sized>(backend: &mut B, plan: &EdgePlan) -> Result<ApplySummary, BackendError> {
    Applier::new(backend).apply(plan)
}
