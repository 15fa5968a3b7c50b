// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene files: node kinds plus the nodes to build from them.
//!
//! Scenes are RON documents:
//!
//! ```ron
//! (
//!     kinds: [
//!         (name: "transform", attributes: [
//!             (name: "translate", short_name: "t", attr_type: Compound, children: [
//!                 (name: "translateX", short_name: "tx", attr_type: Double),
//!             ]),
//!         ]),
//!     ],
//!     nodes: [
//!         (kind: "transform", name: "root", values: { "t": [1.0] }),
//!     ],
//! )
//! ```

use indexmap::IndexMap;
use nodebind_graph::{
    Backend, BindError, BuiltNode, EdgePlan, Literal, MemoryBackend, NodeBuilder, NodeKind, NodeTemplate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error type for the command line front end
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Reading the scene failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The scene is not valid RON
    #[error("Scene parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node could not be built
    #[error("Node '{node}': {source}")]
    Bind {
        /// Requested node name, or its kind if unnamed
        node: String,
        /// Underlying failure
        #[source]
        source: BindError,
    },
}

/// A scene description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Node kinds available to the scene
    #[serde(default)]
    pub kinds: Vec<NodeKind>,
    /// Nodes to build, in order
    #[serde(default)]
    pub nodes: Vec<NodeBuilder>,
}

/// Values and connections of a graph after apply
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphDump {
    /// Nodes with their written values
    pub nodes: Vec<NodeDump>,
    /// Live connections as `(source, dest)`
    pub connections: Vec<(String, String)>,
}

/// One node of a [`GraphDump`]
#[derive(Debug, Clone, Serialize)]
pub struct NodeDump {
    /// Node name
    pub name: String,
    /// Node kind
    pub kind: String,
    /// Written values by attribute
    pub values: IndexMap<String, Literal>,
}

impl Scene {
    /// Load a scene file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        let scene = Self::from_ron(&text)?;
        tracing::info!(
            "Loaded scene {:?}: {} kinds, {} nodes",
            path,
            scene.kinds.len(),
            scene.nodes.len()
        );
        Ok(scene)
    }

    /// Parse a scene from RON text
    pub fn from_ron(text: &str) -> Result<Self, AppError> {
        Ok(ron::from_str(text)?)
    }

    /// An empty graph that knows the scene's node kinds
    pub fn backend(&self) -> MemoryBackend {
        MemoryBackend::new(self.kinds.iter().cloned().collect())
    }

    /// Resolve every node's bindings without applying anything
    pub fn plan(&self) -> Result<Vec<EdgePlan>, AppError> {
        let mut backend = self.backend();
        self.nodes
            .iter()
            .map(|builder| builder.plan(&mut backend).map_err(|e| bind_error(builder, e)))
            .collect()
    }

    /// Build every node in order and return the resulting graph
    pub fn apply(&self) -> Result<(MemoryBackend, Vec<BuiltNode>), AppError> {
        let mut backend = self.backend();
        let built = self
            .nodes
            .iter()
            .map(|builder| builder.build(&mut backend).map_err(|e| bind_error(builder, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((backend, built))
    }

    /// Bindable slots of a node kind
    pub fn slots(&self, kind: &str) -> Result<NodeTemplate, AppError> {
        let mut backend = self.backend();
        let builder = NodeBuilder::new(kind);
        let node = backend
            .create_node(kind, "")
            .map_err(|e| bind_error(&builder, e.into()))?;
        NodeTemplate::introspect(&backend, &node).map_err(|e| bind_error(&builder, e.into()))
    }
}

impl GraphDump {
    /// Snapshot a graph
    pub fn capture(backend: &MemoryBackend) -> Self {
        Self {
            nodes: backend
                .nodes()
                .map(|node| NodeDump {
                    name: node.name.clone(),
                    kind: node.kind.clone(),
                    values: node.values.clone(),
                })
                .collect(),
            connections: backend
                .connections()
                .map(|c| (c.source.clone(), c.dest.clone()))
                .collect(),
        }
    }
}

fn bind_error(builder: &NodeBuilder, source: BindError) -> AppError {
    let node = if builder.name.is_empty() {
        builder.kind.clone()
    } else {
        builder.name.clone()
    };
    AppError::Bind { node, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodebind_graph::{Backend, BackendError, EditMode, ResolutionError};

    const RIG: &str = include_str!("../scenes/rig.ron");

    #[test]
    fn test_rig_scene_plans() {
        let scene = Scene::from_ron(RIG).unwrap();
        let plans = scene.plan().unwrap();
        assert_eq!(plans.len(), scene.nodes.len());

        let blend = plans.iter().find(|p| p.node == "blend").unwrap();
        assert_eq!(blend.count(EditMode::Transfer), 1);
        assert!(blend.to_string().contains("blend.outputR -> follower.translateX"));
    }

    #[test]
    fn test_rig_scene_applies() {
        let scene = Scene::from_ron(RIG).unwrap();
        let (backend, built) = scene.apply().unwrap();
        assert_eq!(built.len(), scene.nodes.len());

        assert!(backend.is_connected("driver.translate", "blend.color1"));
        assert!(backend.is_connected("blend.outputG", "follower.translateY"));
        assert!(backend.is_connected("driver.translate", "sum.input3D[1]"));
        assert_eq!(backend.get_value("mirror.tx").unwrap(), Literal::Float(2.0));
        assert!(!backend.is_connected("driver.ty", "mirror.tx"));
        assert_eq!(backend.get_value("blend.blender").unwrap(), Literal::Float(0.25));

        let dump = GraphDump::capture(&backend);
        assert_eq!(dump.connections.len(), backend.connection_count());
        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"driver\""));
    }

    #[test]
    fn test_slots_for_kind() {
        let scene = Scene::from_ron(RIG).unwrap();
        let template = scene.slots("blendColors").unwrap();
        assert!(template.get("c1").is_some());
        assert!(template.get("op_dest").is_some());

        let err = scene.slots("nope").unwrap_err();
        assert!(matches!(
            err,
            AppError::Bind {
                source: BindError::Backend(BackendError::UnknownNodeKind(_)),
                ..
            }
        ));
    }

    #[test]
    fn test_bad_binding_names_the_node() {
        let mut scene = Scene::from_ron(RIG).unwrap();
        scene.nodes.push(NodeBuilder::new("transform").name("broken").set("t_dest", 1));

        let err = scene.apply().unwrap_err();
        let AppError::Bind { node, source } = err else {
            panic!("expected a bind error");
        };
        assert_eq!(node, "broken");
        assert!(matches!(source, BindError::Resolution(ResolutionError::Unsupported { .. })));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Scene::from_ron("(kinds: 3)"), Err(AppError::Parse(_))));
        let empty = Scene::from_ron("(kinds: [], nodes: [])").unwrap();
        assert!(empty.backend().list_attributes("x", false).is_err());
    }
}
