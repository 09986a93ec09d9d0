//! # canvas_terraform
//!
//! Compiles a resource graph into Terraform configuration.
//!
//! Nodes are visited in topological order (insertion order if the graph
//! has a cycle). Each node's plugin returns configuration blocks whose
//! cross-node values are references; the renderer prints those as dotted
//! paths. Blocks are grouped into a stable file set:
//!
//! - `provider.tf`, `variables.tf`
//! - one file per non-empty category (`network.tf`, `compute.tf`, ...)
//! - `outputs.tf` when any plugin emitted outputs
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use canvas_model::{Graph, Node, ResourceKind};
//! use canvas_plugins::PluginRegistry;
//! use canvas_terraform::TerraformGenerator;
//!
//! let graph = Graph::new().with_node(Node::new(ResourceKind::PubsubTopic, "events"));
//! let files = TerraformGenerator::new(Arc::new(PluginRegistry::builtin())).generate(&graph);
//!
//! let messaging = files.iter().find(|f| f.filename == "messaging.tf").unwrap();
//! assert!(messaging.content.contains("resource \"google_pubsub_topic\" \"events\""));
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod render;
pub mod writer;

pub use config::GeneratorConfig;
pub use error::{TerraformError, TerraformResult};
pub use generator::{CollectedBlocks, TerraformGenerator};
pub use render::HclRenderer;
pub use writer::write_files;
