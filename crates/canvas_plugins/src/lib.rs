//! # canvas_plugins
//!
//! The resource plugin catalogue and its registry.
//!
//! Each resource kind has one stateless plugin supplying:
//!
//! - **Defaults**: the initial property mapping for new nodes
//! - **Schema**: an editable field description for the inspector
//! - **Validation**: per-node diagnostics
//! - **Code generation**: configuration blocks with cross-node references
//! - **Edge suggestions**: the natural attachment points of the kind
//!
//! ## Example
//!
//! ```rust
//! use canvas_model::{ResourceCategory, ResourceKind};
//! use canvas_plugins::PluginRegistry;
//!
//! let registry = PluginRegistry::builtin();
//! let plugin = registry.get(ResourceKind::ComputeNetwork).unwrap();
//! assert_eq!(plugin.category(), ResourceCategory::Network);
//! assert_eq!(plugin.display_name(), "VPC Network");
//! ```

pub mod context;
pub mod error;
pub mod plugin;
pub mod plugins;
pub mod registry;

pub use context::{resource_identifier, GeneratorContext, ValidationContext};
pub use error::{PluginError, PluginResult};
pub use plugin::{EdgeSuggestion, FieldDescriptor, FieldType, ResourcePlugin, Schema};
pub use registry::{suggest_relationship, PluginRegistry};
