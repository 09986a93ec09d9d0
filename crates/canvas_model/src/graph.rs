//! Nodes, edges and the graph snapshot, plus the editing operations the
//! canvas uses to build one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};
use crate::kind::{EdgeRelationship, NodeKind, ResourceKind};

/// Open property mapping of a node.
///
/// Keys are not checked against a plugin schema here; validation is advisory.
pub type Properties = serde_json::Map<String, Value>;

/// Canvas position. Only the editor reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

fn initial_version() -> u64 {
    1
}

/// A single infrastructure resource placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// User label; becomes the generated identifier. Unique per kind.
    pub name: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Bumped on every property mutation. Cache-invalidation signal only.
    #[serde(default = "initial_version")]
    pub version: u64,
    #[serde(default)]
    pub position: Position,
}

impl Node {
    /// Create a node with a generated id and no properties.
    pub fn new(kind: impl Into<NodeKind>, name: impl Into<String>) -> Self {
        Self {
            id: new_node_id(),
            kind: kind.into(),
            name: name.into(),
            properties: Properties::new(),
            tags: Vec::new(),
            version: initial_version(),
            position: Position::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// The catalogue kind, if known to this build.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        self.kind.known()
    }
}

/// A directed relationship: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub relationship: EdgeRelationship,
}

impl Edge {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relationship: EdgeRelationship,
    ) -> Self {
        Self {
            id: new_edge_id(),
            from: from.into(),
            to: to.into(),
            relationship,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether either endpoint is `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }
}

/// An ordered node list plus an ordered edge list.
///
/// No adjacency index is stored; consumers derive one per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node as-is. Builder for fixtures and loaders.
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append an edge as-is, without the editor's construction checks.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn nodes_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Outgoing edges of `node_id`, in edge order.
    pub fn outgoing(&self, node_id: &str) -> impl Iterator<Item = &Edge> {
        let node_id = node_id.to_string();
        self.edges.iter().filter(move |e| e.from == node_id)
    }

    /// Add a node of `kind` seeded with `defaults`; returns its id.
    ///
    /// The name is `<kind-label>-<n>` where `n` counts existing nodes of
    /// the same kind.
    pub fn add_node(
        &mut self,
        kind: ResourceKind,
        position: Position,
        defaults: Properties,
    ) -> String {
        let existing = self.nodes_of_kind(kind).count();
        let node = Node::new(kind, format!("{}-{}", kind.label(), existing + 1))
            .with_properties(defaults)
            .with_position(position);
        let id = node.id.clone();
        debug!("Adding node {} ({})", id, kind);
        self.nodes.push(node);
        id
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, node_id: &str) -> ModelResult<Node> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| ModelError::NodeNotFound(node_id.to_string()))?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| !e.touches(node_id));
        debug!("Removed node {} and its edges", node_id);
        Ok(node)
    }

    /// Merge `patch` into a node's properties and bump its version.
    pub fn update_properties(&mut self, node_id: &str, patch: Properties) -> ModelResult<u64> {
        let node = self.node_mut(node_id)?;
        node.properties.extend(patch);
        node.version += 1;
        Ok(node.version)
    }

    pub fn rename_node(&mut self, node_id: &str, name: impl Into<String>) -> ModelResult<()> {
        self.node_mut(node_id)?.name = name.into();
        Ok(())
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> ModelResult<()> {
        self.node_mut(node_id)?.position = position;
        Ok(())
    }

    /// Add an edge `from -> to`; returns its id.
    ///
    /// Self-loops and a second edge for the same ordered pair are rejected.
    /// The reverse pair is allowed here.
    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        relationship: EdgeRelationship,
    ) -> ModelResult<String> {
        if from == to {
            return Err(ModelError::SelfLoop(from.to_string()));
        }
        for endpoint in [from, to] {
            if !self.contains_node(endpoint) {
                return Err(ModelError::NodeNotFound(endpoint.to_string()));
            }
        }
        if self.edges.iter().any(|e| e.from == from && e.to == to) {
            return Err(ModelError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let edge = Edge::new(from, to, relationship);
        let id = edge.id.clone();
        debug!("Adding edge {} ({} -> {}, {})", id, from, to, relationship);
        self.edges.push(edge);
        Ok(id)
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> ModelResult<Edge> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or_else(|| ModelError::EdgeNotFound(edge_id.to_string()))?;
        Ok(self.edges.remove(index))
    }

    fn node_mut(&mut self, node_id: &str) -> ModelResult<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| ModelError::NodeNotFound(node_id.to_string()))
    }
}

fn new_node_id() -> String {
    format!("node_{}", Uuid::new_v4().simple())
}

fn new_edge_id() -> String {
    format!("edge_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_nodes() -> (Graph, String, String) {
        let mut graph = Graph::new();
        let a = graph.add_node(ResourceKind::ComputeNetwork, Position::default(), Properties::new());
        let b = graph.add_node(ResourceKind::ComputeSubnetwork, Position::default(), Properties::new());
        (graph, a, b)
    }

    #[test]
    fn test_add_node_auto_names_per_kind() {
        let mut graph = Graph::new();
        graph.add_node(ResourceKind::ComputeNetwork, Position::default(), Properties::new());
        let second = graph.add_node(ResourceKind::ComputeNetwork, Position::default(), Properties::new());
        let topic = graph.add_node(ResourceKind::PubsubTopic, Position::default(), Properties::new());

        assert_eq!(graph.node(&second).unwrap().name, "compute-network-2");
        assert_eq!(graph.node(&topic).unwrap().name, "pubsub-topic-1");
        assert_eq!(graph.node(&topic).unwrap().version, 1);
        assert!(second.starts_with("node_"));
    }

    #[test]
    fn test_add_edge_rejects_self_loop_and_duplicate() {
        let (mut graph, a, b) = two_nodes();

        assert!(matches!(
            graph.add_edge(&a, &a, EdgeRelationship::DependsOn),
            Err(ModelError::SelfLoop(_))
        ));

        graph.add_edge(&b, &a, EdgeRelationship::NetworkAttachment).unwrap();
        assert!(matches!(
            graph.add_edge(&b, &a, EdgeRelationship::DependsOn),
            Err(ModelError::DuplicateEdge { .. })
        ));

        // The reverse pair is structurally allowed.
        graph.add_edge(&a, &b, EdgeRelationship::DependsOn).unwrap();
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_add_edge_requires_existing_endpoints() {
        let (mut graph, a, _) = two_nodes();
        assert!(matches!(
            graph.add_edge(&a, "ghost", EdgeRelationship::DependsOn),
            Err(ModelError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let (mut graph, a, b) = two_nodes();
        let c = graph.add_node(ResourceKind::PubsubTopic, Position::default(), Properties::new());
        graph.add_edge(&b, &a, EdgeRelationship::NetworkAttachment).unwrap();
        graph.add_edge(&c, &b, EdgeRelationship::DependsOn).unwrap();
        graph.add_edge(&c, &a, EdgeRelationship::DependsOn).unwrap();

        graph.remove_node(&a).unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert!(graph.edges.iter().all(|e| !e.touches(&a)));
    }

    #[test]
    fn test_update_properties_bumps_version() {
        let (mut graph, a, _) = two_nodes();
        let mut patch = Properties::new();
        patch.insert("mtu".to_string(), json!(1500));

        let version = graph.update_properties(&a, patch).unwrap();
        assert_eq!(version, 2);

        graph.rename_node(&a, "vpc1").unwrap();
        graph.move_node(&a, Position::new(10.0, 20.0)).unwrap();

        let node = graph.node(&a).unwrap();
        assert_eq!(node.version, 2);
        assert_eq!(node.name, "vpc1");
        assert_eq!(node.properties["mtu"], json!(1500));
    }

    #[test]
    fn test_graph_deserializes_editor_wire_format() {
        let raw = json!({
            "nodes": [{
                "id": "n1",
                "kind": "google_compute_network",
                "name": "vpc1",
                "properties": { "name": "vpc1", "mtu": 1460 },
                "version": 3,
                "position": { "x": 1.0, "y": 2.0 }
            }],
            "edges": [{ "id": "e1", "from": "n2", "to": "n1", "relationship": "network_attachment" }]
        });

        let graph: Graph = serde_json::from_value(raw).unwrap();
        assert_eq!(graph.nodes[0].kind, ResourceKind::ComputeNetwork);
        assert_eq!(graph.nodes[0].version, 3);
        assert_eq!(graph.edges[0].relationship, EdgeRelationship::NetworkAttachment);
    }
}
