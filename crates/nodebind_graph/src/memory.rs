// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory node graph implementing [`Backend`].
//!
//! Behaves like a small host document model: nodes are instances of
//! registered [`NodeKind`]s, connected destinations read through to their
//! source, and breaking a connection leaves the last value behind.

use crate::attribute::AttrDef;
use crate::backend::{AttrQuery, AttrType, Backend, BackendError, QueryAnswer};
use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeKind, NodeKindRegistry};
use crate::value::Literal;
use indexmap::IndexMap;

/// Upper bound on connection hops followed when reading a value
const MAX_DEPTH: usize = 64;

/// An attribute path resolved against a node's schema
#[derive(Debug, Clone)]
struct Address {
    node: String,
    /// Canonical attribute key using long names, e.g. `input[0].inputValue`
    key: String,
    def: AttrDef,
    /// Every array segment along the path carries an index
    complete: bool,
}

impl Address {
    fn full(&self) -> String {
        format!("{}.{}", self.node, self.key)
    }

    fn child(&self, child: &AttrDef) -> Self {
        Self {
            node: self.node.clone(),
            key: format!("{}.{}", self.key, child.name),
            def: child.clone(),
            complete: self.complete && !child.multi,
        }
    }
}

/// Split `name[3]` into its name and index
fn parse_segment(segment: &str) -> Option<(&str, Option<usize>)> {
    let Some(open) = segment.strip_suffix(']').and_then(|s| s.rfind('[')) else {
        return (!segment.is_empty()).then_some((segment, None));
    };
    let index = segment[open + 1..segment.len() - 1].parse().ok()?;
    let name = &segment[..open];
    (!name.is_empty()).then_some((name, Some(index)))
}

/// Whether one path is the other or one of its ancestors
fn overlaps(a: &str, b: &str) -> bool {
    let nested = |outer: &str, inner: &str| {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
    };
    a == b || nested(a, b) || nested(b, a)
}

/// In-memory host graph
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    registry: NodeKindRegistry,
    nodes: IndexMap<String, Node>,
    connections: IndexMap<ConnectionId, Connection>,
}

impl MemoryBackend {
    /// Create an empty graph over a registry of node kinds
    pub fn new(registry: NodeKindRegistry) -> Self {
        Self {
            registry,
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Register an extra node kind
    pub fn register(&mut self, kind: NodeKind) {
        self.registry.register(kind);
    }

    /// The node kind registry
    pub fn registry(&self) -> &NodeKindRegistry {
        &self.registry
    }

    /// Get a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// All nodes, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, name: &str) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(name));
        self.nodes.shift_remove(name)
    }

    /// All live connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether `source` is directly connected into `dest`
    pub fn is_connected(&self, source: &str, dest: &str) -> bool {
        let (Ok(source), Ok(dest)) = (self.resolve(source), self.resolve(dest)) else {
            return false;
        };
        let (source, dest) = (source.full(), dest.full());
        self.connections
            .values()
            .any(|c| c.source == source && c.dest == dest)
    }

    /// Current value of an attribute, following connections
    pub fn get_value(&self, path: &str) -> Result<Literal, BackendError> {
        let address = self.resolve(path)?;
        self.value_of(&address, 0)
    }

    /// Lock or unlock an attribute and everything below it
    pub fn lock_attr(&mut self, path: &str, locked: bool) -> Result<(), BackendError> {
        let address = self.resolve(path)?;
        let node = self
            .nodes
            .get_mut(&address.node)
            .ok_or_else(|| BackendError::NodeNotFound(address.node.clone()))?;
        if locked {
            node.locked.insert(address.key);
        } else {
            node.locked.remove(&address.key);
        }
        Ok(())
    }

    fn kind_of(&self, node: &str) -> Result<&NodeKind, BackendError> {
        let node = self
            .nodes
            .get(node)
            .ok_or_else(|| BackendError::NodeNotFound(node.to_string()))?;
        self.registry
            .get(&node.kind)
            .ok_or_else(|| BackendError::UnknownNodeKind(node.kind.clone()))
    }

    fn resolve(&self, path: &str) -> Result<Address, BackendError> {
        let not_found = || BackendError::AttributeNotFound(path.to_string());
        let (node, rest) = path.split_once('.').ok_or_else(not_found)?;
        let kind = self.kind_of(node)?;

        let key_for = |def: &AttrDef, index: Option<usize>| match (def.multi, index) {
            (true, Some(i)) => Some((format!("{}[{i}]", def.name), true)),
            (true, None) => Some((def.name.clone(), false)),
            (false, None) => Some((def.name.clone(), true)),
            (false, Some(_)) => None,
        };

        let mut segments = rest.split('.');
        let (name, index) = segments
            .next()
            .and_then(parse_segment)
            .ok_or_else(not_found)?;

        let (mut key, mut def, mut complete) = if let Some(def) = kind.attribute(name) {
            let (key, complete) = key_for(def, index).ok_or_else(not_found)?;
            (key, def, complete)
        } else if let Some((parent, def)) = kind.parent_of(name) {
            let (key, complete) = key_for(def, index).ok_or_else(not_found)?;
            (format!("{}.{key}", parent.name), def, complete)
        } else {
            return Err(not_found());
        };

        for segment in segments {
            let (name, index) = parse_segment(segment).ok_or_else(not_found)?;
            let (_, child) = def.child(name).ok_or_else(not_found)?;
            let (child_key, child_complete) = key_for(child, index).ok_or_else(not_found)?;
            key = format!("{key}.{child_key}");
            complete &= child_complete;
            def = child;
        }

        Ok(Address {
            node: node.to_string(),
            key,
            def: def.clone(),
            complete,
        })
    }

    /// Source feeding a canonical full path, directly or through a
    /// connected parent compound
    fn upstream(&self, full: &str) -> Option<String> {
        if let Some(connection) = self.connections.values().find(|c| c.dest == full) {
            return Some(connection.source.clone());
        }

        let (parent, child) = full.rsplit_once('.')?;
        if !parent.contains('.') {
            return None;
        }
        let parent_source = self.upstream(parent)?;
        let (child_name, _) = parse_segment(child)?;
        let (index, _) = self.resolve(parent).ok()?.def.child(child_name)?;
        let source = self.resolve(&parent_source).ok()?;
        let source_child = source.def.children.get(index)?;
        Some(format!("{parent_source}.{}", source_child.name))
    }

    fn value_of(&self, address: &Address, depth: usize) -> Result<Literal, BackendError> {
        if !address.complete {
            return Err(BackendError::TypeMismatch {
                path: address.full(),
                expected: "array element".to_string(),
                found: "whole array".to_string(),
            });
        }

        if depth < MAX_DEPTH {
            if let Some(source) = self.upstream(&address.full()) {
                let source = self.resolve(&source)?;
                let value = self.value_of(&source, depth + 1)?;
                let hint = Some(address.def.attr_type);
                return Ok(address.def.coerce(&value, hint).unwrap_or(value));
            }
        }

        if address.def.is_compound() {
            return address
                .def
                .children
                .iter()
                .map(|child| self.value_of(&address.child(child), depth))
                .collect::<Result<Vec<_>, _>>()
                .map(Literal::List);
        }

        Ok(self
            .nodes
            .get(&address.node)
            .and_then(|node| node.values.get(&address.key))
            .cloned()
            .unwrap_or_else(|| address.def.initial_value()))
    }

    /// Store a value, splitting compound payloads across the children.
    /// With `exact`, each leaf is checked against its own type.
    fn write(
        &mut self,
        address: &Address,
        value: &Literal,
        type_hint: Option<AttrType>,
        exact: bool,
    ) -> Result<(), BackendError> {
        let mismatch = || BackendError::TypeMismatch {
            path: address.full(),
            expected: address.def.attr_type.name().to_string(),
            found: value.kind().to_string(),
        };

        if address.def.is_compound() {
            let Literal::List(items) = value else {
                return Err(mismatch());
            };
            if items.len() != address.def.children.len() {
                return Err(mismatch());
            }
            for (child, item) in address.def.children.iter().zip(items) {
                self.write(&address.child(child), item, type_hint, exact)?;
            }
            return Ok(());
        }

        let hint = if exact {
            Some(address.def.attr_type)
        } else {
            type_hint
        };
        let stored = address.def.coerce(value, hint).ok_or_else(mismatch)?;
        let node = self
            .nodes
            .get_mut(&address.node)
            .ok_or_else(|| BackendError::NodeNotFound(address.node.clone()))?;
        node.values.insert(address.key.clone(), stored);
        Ok(())
    }

    /// Remove a connection. The destination keeps whatever value flowed in
    /// last.
    fn break_connection(&mut self, id: ConnectionId, dest: &str) -> Result<(), BackendError> {
        let address = self.resolve(dest)?;
        let last = self.value_of(&address, 0)?;
        self.connections.shift_remove(&id);
        self.write(&address, &last, None, true)
    }

    fn is_locked(&self, address: &Address) -> bool {
        let Some(node) = self.nodes.get(&address.node) else {
            return false;
        };
        let key = &address.key;
        node.locked.contains(key)
            || key
                .match_indices(['.', '['])
                .any(|(i, _)| node.locked.contains(&key[..i]))
    }

    fn check_writable(&self, address: &Address) -> Result<(), BackendError> {
        if !address.complete {
            return Err(BackendError::TypeMismatch {
                path: address.full(),
                expected: "array element".to_string(),
                found: "whole array".to_string(),
            });
        }
        if !address.def.writable {
            return Err(BackendError::NotWritable(address.full()));
        }
        if self.is_locked(address) {
            return Err(BackendError::Locked(address.full()));
        }
        Ok(())
    }

    fn check_compatible(source: &Address, dest: &Address) -> Result<(), BackendError> {
        fn compatible(source: &AttrDef, dest: &AttrDef) -> bool {
            if source.is_compound() || dest.is_compound() {
                return source.children.len() == dest.children.len()
                    && source
                        .children
                        .iter()
                        .zip(&dest.children)
                        .all(|(s, d)| compatible(s, d));
            }
            source.attr_type.can_connect_to(&dest.attr_type)
        }

        if compatible(&source.def, &dest.def) {
            Ok(())
        } else {
            Err(BackendError::TypeMismatch {
                path: dest.full(),
                expected: dest.def.attr_type.name().to_string(),
                found: source.def.attr_type.name().to_string(),
            })
        }
    }

    fn unique_name(&self, kind: &str, requested: &str) -> String {
        let sanitized: String = requested
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
            .collect();

        if !sanitized.is_empty() && !self.nodes.contains_key(&sanitized) {
            return sanitized;
        }

        let stem = if sanitized.is_empty() {
            kind
        } else {
            sanitized.trim_end_matches(|c: char| c.is_ascii_digit())
        };
        (1..)
            .map(|n| format!("{stem}{n}"))
            .find(|name| !self.nodes.contains_key(name))
            .unwrap_or_default()
    }
}

impl Backend for MemoryBackend {
    fn create_node(&mut self, kind: &str, name: &str) -> Result<String, BackendError> {
        let node_kind = self
            .registry
            .get(kind)
            .ok_or_else(|| BackendError::UnknownNodeKind(kind.to_string()))?;
        let name = self.unique_name(kind, name);
        let node = Node::new(name.clone(), node_kind);
        self.nodes.insert(name.clone(), node);
        tracing::trace!(kind, name = %name, "create node");
        Ok(name)
    }

    fn connect_attr(&mut self, source: &str, dest: &str, force: bool) -> Result<(), BackendError> {
        let source = self.resolve(source)?;
        let dest = self.resolve(dest)?;

        if !source.complete {
            return Err(BackendError::TypeMismatch {
                path: source.full(),
                expected: "array element".to_string(),
                found: "whole array".to_string(),
            });
        }
        if !source.def.readable {
            return Err(BackendError::NotReadable(source.full()));
        }
        self.check_writable(&dest)?;
        Self::check_compatible(&source, &dest)?;

        let (source, dest) = (source.full(), dest.full());

        let mut hop = Some(source.clone());
        for _ in 0..MAX_DEPTH {
            let Some(current) = hop else { break };
            if overlaps(&current, &dest) {
                return Err(BackendError::Cycle {
                    source_path: source,
                    dest,
                });
            }
            hop = self.upstream(&current);
        }

        // Incoming connections on the destination, its ancestors or its children
        let occupied: Vec<_> = self
            .connections
            .iter()
            .filter(|(_, c)| overlaps(&c.dest, &dest))
            .map(|(id, c)| (*id, c.source.clone(), c.dest.clone()))
            .collect();

        if occupied.iter().any(|(_, s, d)| *s == source && *d == dest) {
            return Ok(());
        }
        if let (false, Some((_, existing, _))) = (force, occupied.first()) {
            return Err(BackendError::AlreadyConnected {
                dest,
                existing: existing.clone(),
            });
        }
        for (id, _, held) in &occupied {
            self.break_connection(*id, held)?;
        }

        tracing::trace!(%source, %dest, force, "connect");
        let connection = Connection::new(source, dest);
        self.connections.insert(connection.id, connection);
        Ok(())
    }

    fn disconnect_attr(&mut self, source: &str, dest: &str) -> Result<(), BackendError> {
        let source = self.resolve(source)?;
        let dest = self.resolve(dest)?;
        let (source_path, dest_path) = (source.full(), dest.full());

        let Some(id) = self
            .connections
            .iter()
            .find(|(_, c)| c.source == source_path && c.dest == dest_path)
            .map(|(id, _)| *id)
        else {
            return Err(BackendError::NotConnected {
                source_path,
                dest: dest_path,
            });
        };

        self.break_connection(id, &dest_path)?;

        tracing::trace!(source = %source_path, dest = %dest_path, "disconnect");
        Ok(())
    }

    fn set_attr(
        &mut self,
        path: &str,
        value: &Literal,
        type_hint: Option<AttrType>,
    ) -> Result<(), BackendError> {
        let address = self.resolve(path)?;
        self.check_writable(&address)?;

        let full = address.full();
        if let Some(existing) = self.upstream(&full) {
            return Err(BackendError::AlreadyConnected {
                dest: full,
                existing,
            });
        }

        self.write(&address, value, type_hint, false)?;
        tracing::trace!(path = %full, %value, "set");
        Ok(())
    }

    fn attr_type(&self, path: &str) -> Result<AttrType, BackendError> {
        Ok(self.resolve(path)?.def.attr_type)
    }

    fn query_attribute(
        &self,
        attr: &str,
        node: &str,
        query: AttrQuery,
    ) -> Result<QueryAnswer, BackendError> {
        let def = self
            .kind_of(node)?
            .find(attr)
            .ok_or_else(|| BackendError::AttributeNotFound(format!("{node}.{attr}")))?;

        Ok(match query {
            AttrQuery::Writable => QueryAnswer::Flag(def.writable),
            AttrQuery::Readable => QueryAnswer::Flag(def.readable),
            AttrQuery::Multi => QueryAnswer::Flag(def.multi),
            AttrQuery::ListChildren => {
                QueryAnswer::Names(def.children.iter().map(|c| c.name.clone()).collect())
            }
        })
    }

    fn list_attributes(&self, node: &str, short_names: bool) -> Result<Vec<String>, BackendError> {
        Ok(self.kind_of(node)?.attribute_names(short_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> MemoryBackend {
        let transform = NodeKind::new("transform")
            .with_attr(AttrDef::vector("translate", "t", ["X", "Y", "Z"]))
            .with_attr(AttrDef::vector("scale", "s", ["X", "Y", "Z"]))
            .with_attr(AttrDef::double("weight", "w"))
            .with_attr(AttrDef::string("notes", "nts"))
            .with_attr(AttrDef::matrix("worldMatrix", "wm").read_only());
        let blend = NodeKind::new("blend")
            .with_attr(
                AttrDef::compound("input", "i", vec![AttrDef::double("inputValue", "iv")]).multi(),
            )
            .with_attr(AttrDef::long("count", "c"))
            .with_attr(AttrDef::double("output", "o").read_only());

        let mut backend = MemoryBackend::new([transform, blend].into_iter().collect());
        backend.create_node("transform", "a").unwrap();
        backend.create_node("transform", "b").unwrap();
        backend.create_node("blend", "mix").unwrap();
        backend
    }

    #[test]
    fn test_node_naming() {
        let mut backend = backend();
        assert_eq!(backend.create_node("transform", "").unwrap(), "transform1");
        assert_eq!(backend.create_node("transform", "").unwrap(), "transform2");
        assert_eq!(backend.create_node("transform", "a").unwrap(), "a1");
        assert_eq!(backend.create_node("transform", "my node").unwrap(), "my_node");
        assert!(matches!(
            backend.create_node("nope", "x"),
            Err(BackendError::UnknownNodeKind(_))
        ));
    }

    #[test]
    fn test_path_resolution() {
        let backend = backend();
        assert_eq!(backend.resolve("a.tx").unwrap().key, "translate.translateX");
        assert_eq!(backend.resolve("a.t.ty").unwrap().key, "translate.translateY");
        assert_eq!(backend.resolve("mix.i[2].iv").unwrap().key, "input[2].inputValue");
        assert!(!backend.resolve("mix.input").unwrap().complete);
        assert!(backend.resolve("a.weight[0]").is_err());
        assert!(backend.resolve("a.missing").is_err());
        assert!(matches!(backend.resolve("ghost.tx"), Err(BackendError::NodeNotFound(_))));
        assert_eq!(parse_segment("name[12]"), Some(("name", Some(12))));
        assert_eq!(parse_segment("[1]"), None);
    }

    #[test]
    fn test_set_and_read_values() {
        let mut backend = backend();
        backend.set_attr("a.tx", &Literal::Int(2), None).unwrap();
        backend
            .set_attr("a.t", &Literal::List(vec![Literal::Float(1.0), Literal::Int(5), Literal::Float(3.0)]), None)
            .unwrap();
        assert_eq!(backend.get_value("a.ty").unwrap(), Literal::Float(5.0));
        assert_eq!(backend.get_value("a.translateX").unwrap(), Literal::Float(1.0));

        backend.set_attr("mix.c", &Literal::Float(2.6), None).unwrap();
        assert_eq!(backend.get_value("mix.count").unwrap(), Literal::Int(3));

        let err = backend.set_attr("a.nts", &Literal::String("x".into()), None).unwrap_err();
        assert!(matches!(err, BackendError::TypeMismatch { .. }));
        backend
            .set_attr("a.nts", &Literal::String("x".into()), Some(AttrType::String))
            .unwrap();

        assert!(matches!(
            backend.set_attr("a.wm", &crate::attribute::identity_matrix(), Some(AttrType::Matrix)),
            Err(BackendError::NotWritable(_))
        ));
    }

    #[test]
    fn test_locked_attributes_reject_edits() {
        let mut backend = backend();
        backend.lock_attr("a.t", true).unwrap();
        assert!(matches!(
            backend.set_attr("a.tx", &Literal::Int(1), None),
            Err(BackendError::Locked(_))
        ));
        assert!(matches!(
            backend.connect_attr("b.tx", "a.ty", true),
            Err(BackendError::Locked(_))
        ));
        backend.lock_attr("a.t", false).unwrap();
        backend.set_attr("a.tx", &Literal::Int(1), None).unwrap();
    }

    #[test]
    fn test_connection_reads_through_and_force() {
        let mut backend = backend();
        backend.set_attr("a.tx", &Literal::Float(4.0), None).unwrap();
        backend.connect_attr("a.tx", "b.weight", false).unwrap();
        assert_eq!(backend.get_value("b.w").unwrap(), Literal::Float(4.0));

        backend.set_attr("a.tx", &Literal::Float(6.0), None).unwrap();
        assert_eq!(backend.get_value("b.w").unwrap(), Literal::Float(6.0));

        // Same pair again is a no-op
        backend.connect_attr("a.tx", "b.weight", false).unwrap();
        assert_eq!(backend.connection_count(), 1);

        assert!(matches!(
            backend.connect_attr("a.ty", "b.weight", false),
            Err(BackendError::AlreadyConnected { .. })
        ));
        backend.connect_attr("a.ty", "b.weight", true).unwrap();
        assert_eq!(backend.connection_count(), 1);
        assert!(backend.is_connected("a.ty", "b.w"));
        assert!(!backend.is_connected("a.tx", "b.w"));

        assert!(matches!(
            backend.set_attr("b.w", &Literal::Int(1), None),
            Err(BackendError::AlreadyConnected { .. })
        ));
    }

    #[test]
    fn test_compound_connection_feeds_children() {
        let mut backend = backend();
        backend
            .set_attr("a.t", &Literal::List(vec![Literal::Int(1), Literal::Int(2), Literal::Int(3)]), None)
            .unwrap();
        backend.connect_attr("a.translate", "b.scale", true).unwrap();
        assert_eq!(backend.get_value("b.sy").unwrap(), Literal::Float(2.0));

        backend.connect_attr("b.sz", "mix.i[0].iv", true).unwrap();
        assert_eq!(backend.get_value("mix.input[0].inputValue").unwrap(), Literal::Float(3.0));
    }

    #[test]
    fn test_child_connection_replaces_parent_connection() {
        let mut backend = backend();
        backend
            .set_attr("a.t", &Literal::List(vec![Literal::Int(1), Literal::Int(2), Literal::Int(3)]), None)
            .unwrap();
        backend.set_attr("a.w", &Literal::Float(9.0), None).unwrap();
        backend.connect_attr("a.translate", "b.translate", true).unwrap();

        assert!(matches!(
            backend.connect_attr("a.weight", "b.ty", false),
            Err(BackendError::AlreadyConnected { .. })
        ));

        backend.connect_attr("a.weight", "b.ty", true).unwrap();
        assert_eq!(backend.connection_count(), 1);
        assert!(!backend.is_connected("a.translate", "b.translate"));
        assert_eq!(backend.get_value("b.ty").unwrap(), Literal::Float(9.0));
        // Siblings keep what the parent connection last delivered
        assert_eq!(backend.get_value("b.tx").unwrap(), Literal::Float(1.0));
        assert_eq!(backend.get_value("b.tz").unwrap(), Literal::Float(3.0));

        // Connecting the parent again takes over from the child
        backend.connect_attr("a.scale", "b.translate", true).unwrap();
        assert_eq!(backend.connection_count(), 1);
        assert!(!backend.is_connected("a.weight", "b.ty"));
    }

    #[test]
    fn test_disconnect_keeps_last_value() {
        let mut backend = backend();
        backend.set_attr("a.tz", &Literal::Float(9.0), None).unwrap();
        backend.connect_attr("a.tz", "b.tz", true).unwrap();
        backend.disconnect_attr("a.tz", "b.tz").unwrap();

        assert_eq!(backend.connection_count(), 0);
        assert_eq!(backend.get_value("b.tz").unwrap(), Literal::Float(9.0));
        backend.set_attr("a.tz", &Literal::Float(1.0), None).unwrap();
        assert_eq!(backend.get_value("b.tz").unwrap(), Literal::Float(9.0));

        assert!(matches!(
            backend.disconnect_attr("a.tz", "b.tz"),
            Err(BackendError::NotConnected { .. })
        ));
    }

    #[test]
    fn test_invalid_connections() {
        let mut backend = backend();
        assert!(matches!(
            backend.connect_attr("a.nts", "b.weight", true),
            Err(BackendError::TypeMismatch { .. })
        ));
        assert!(matches!(
            backend.connect_attr("a.t", "b.weight", true),
            Err(BackendError::TypeMismatch { .. })
        ));
        assert!(matches!(
            backend.connect_attr("mix.o", "mix.o", true),
            Err(BackendError::NotWritable(_))
        ));
        assert!(matches!(
            backend.connect_attr("a.tx", "a.tx", true),
            Err(BackendError::Cycle { .. })
        ));

        backend.connect_attr("a.tx", "b.tx", true).unwrap();
        assert!(matches!(
            backend.connect_attr("b.tx", "a.translate.translateX", true),
            Err(BackendError::Cycle { .. })
        ));
    }

    #[test]
    fn test_schema_queries() {
        let backend = backend();
        assert_eq!(
            backend.attr_children("input", "mix").unwrap(),
            ["inputValue"]
        );
        assert!(backend.is_multi("i", "mix").unwrap());
        assert!(!backend.is_writable("o", "mix").unwrap());
        assert!(backend.attr_children("weight", "a").unwrap().is_empty());
        assert_eq!(backend.attr_type("a.wm").unwrap(), AttrType::Matrix);
        assert_eq!(backend.attr_type("mix.i[0]").unwrap(), AttrType::Compound);
        assert_eq!(
            backend.list_attributes("mix", true).unwrap(),
            ["i", "i.iv", "c", "o"]
        );
    }

    #[test]
    fn test_remove_node_drops_connections() {
        let mut backend = backend();
        backend.connect_attr("a.tx", "b.tx", true).unwrap();
        assert!(backend.remove_node("a").is_some());
        assert_eq!(backend.connection_count(), 0);
        assert_eq!(backend.node_count(), 2);
    }
}
