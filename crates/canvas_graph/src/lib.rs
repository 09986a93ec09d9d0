//! # canvas_graph
//!
//! Generic algorithms over the node/edge graph: adjacency construction,
//! three-colour cycle detection, deterministic Kahn topological sort and
//! neighbour queries.
//!
//! The engine knows nothing about resource kinds beyond node ids and keeps
//! no state between calls.
//!
//! ## Example
//!
//! ```rust
//! use canvas_graph::GraphEngine;
//! use canvas_model::{Edge, EdgeRelationship, Graph, Node, ResourceKind};
//!
//! let graph = Graph::new()
//!     .with_node(Node::new(ResourceKind::ComputeNetwork, "vpc").with_id("a"))
//!     .with_node(Node::new(ResourceKind::ComputeSubnetwork, "sub").with_id("b"))
//!     .with_edge(Edge::new("b", "a", EdgeRelationship::NetworkAttachment));
//!
//! let sorted = GraphEngine::topological_sort(&graph);
//! assert!(!sorted.has_cycle);
//! assert_eq!(sorted.ids(), vec!["b", "a"]);
//! ```

pub mod engine;

pub use engine::{Adjacency, CycleReport, GraphEngine, TopologicalResult};
