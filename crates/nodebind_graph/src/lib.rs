// SPDX-License-Identifier: MIT OR Apache-2.0
//! Attribute binding engine for node graphs.
//!
//! This crate turns a declarative description of a node's attribute
//! bindings into concrete graph edits and applies them:
//! - Persistent connections (`"src.attr"`)
//! - Literal value writes (`3.0`, `"text"`, matrices)
//! - One-shot transfers (`"src.attr!"`, connect then disconnect)
//!
//! ## Architecture
//!
//! Work flows through two stages:
//! - [`Resolver`] expands a [`BindingSpec`] into an ordered [`EdgePlan`],
//!   fanning out arrays and compounds. It is pure and never touches a host.
//! - [`Applier`] executes the plan against a [`Backend`], deciding per edge
//!   whether to connect, set or transfer.
//!
//! [`NodeBuilder`] combines both with schema introspection
//! ([`NodeTemplate`]), and [`MemoryBackend`] is a self-contained host
//! graph for tests and tooling.

pub mod value;
pub mod descriptor;
pub mod edge;
pub mod resolver;
pub mod backend;
pub mod applier;
pub mod attribute;
pub mod node;
pub mod connection;
pub mod memory;
pub mod template;
pub mod builder;

pub use value::{AttrRef, EditMode, Endpoint, Literal, Value};
pub use descriptor::{BindingDescriptor, BindingSpec, Direction, Shape};
pub use edge::{Edge, EdgePlan};
pub use resolver::{resolve, ResolutionError, Resolver};
pub use backend::{AttrQuery, AttrType, Backend, BackendError, QueryAnswer};
pub use applier::{apply, Applier, ApplySummary};
pub use attribute::AttrDef;
pub use node::{NodeKind, NodeKindRegistry};
pub use connection::{Connection, ConnectionId};
pub use memory::MemoryBackend;
pub use template::{NodeTemplate, Slot};
pub use builder::{BindError, BuiltNode, NodeBuilder};
