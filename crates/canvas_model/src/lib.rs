//! # canvas_model
//!
//! Shared data model for CloudCanvas infrastructure diagrams.
//!
//! This crate holds the types every other component exchanges:
//!
//! - **Graph**: nodes (resource instances) and directed edges between them
//! - **Diagnostics**: validation findings produced by the policy engine
//! - **Configuration blocks**: the generator's intermediate representation
//! - **Project envelope**: the versioned file format used by storage/export
//!
//! ## Example
//!
//! ```rust
//! use canvas_model::{EdgeRelationship, Graph, Position, Properties, ResourceKind};
//!
//! let mut graph = Graph::new();
//! let vpc = graph.add_node(ResourceKind::ComputeNetwork, Position::default(), Properties::new());
//! let subnet = graph.add_node(ResourceKind::ComputeSubnetwork, Position::default(), Properties::new());
//! graph
//!     .add_edge(&subnet, &vpc, EdgeRelationship::NetworkAttachment)
//!     .unwrap();
//!
//! assert_eq!(graph.node(&vpc).unwrap().name, "compute-network-1");
//! ```

pub mod block;
pub mod diagnostic;
pub mod error;
pub mod graph;
pub mod kind;
pub mod project;

pub use block::{AttrValue, BlockType, ConfigBlock, GeneratedFile, NestedBlock, Reference};
pub use diagnostic::{codes, Diagnostic, Severity};
pub use error::{ModelError, ModelResult};
pub use graph::{Edge, Graph, Node, Position, Properties};
pub use kind::{EdgeRelationship, NodeKind, ResourceCategory, ResourceKind};
pub use project::{ProjectData, ProjectMetadata, SCHEMA_VERSION};
