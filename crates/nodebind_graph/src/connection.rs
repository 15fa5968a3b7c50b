// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) records of the in-memory graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Handle of one incoming attribute connection. Survives reconnection of
/// other attributes, so the graph can key its connection table by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Fresh handle for a connection being made
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0.simple())
    }
}

/// A live connection between two attributes, by canonical full path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Source path (`node.attr`)
    pub source: String,
    /// Destination path (`node.attr`)
    pub dest: String,
}

impl Connection {
    /// Create a new connection
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            id: ConnectionId::generate(),
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// Check if this connection touches a node
    pub fn involves_node(&self, node: &str) -> bool {
        node_of(&self.source) == node || node_of(&self.dest) == node
    }
}

fn node_of(path: &str) -> &str {
    path.split_once('.').map_or(path, |(node, _)| node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_touches_both_nodes() {
        let connection = Connection::new("a.translate", "b.input[0].inputValue");
        assert!(connection.involves_node("a"));
        assert!(connection.involves_node("b"));
        assert!(!connection.involves_node("input"));
        assert_ne!(connection.id, Connection::new("a.tx", "b.tx").id);
        assert!(connection.id.to_string().starts_with("conn-"));
    }
}
