//! # canvas_policy
//!
//! The validation engine.
//!
//! A pass runs three phases and concatenates their findings:
//!
//! - **Schema**: each node is checked by the plugin for its kind; unknown
//!   kinds become `UNKNOWN_RESOURCE` errors
//! - **Graph**: cycles, dangling edges, name collisions, identifier shape
//! - **Policy**: cross-resource heuristics such as subnets without a VPC
//!
//! Findings are data, never errors. [`DiagnosticReport`] sorts and counts
//! them for presentation.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use canvas_model::Graph;
//! use canvas_plugins::PluginRegistry;
//! use canvas_policy::Validator;
//!
//! let validator = Validator::new(Arc::new(PluginRegistry::builtin()));
//! let report = validator.report(&Graph::new());
//!
//! assert!(!report.has_blocking_errors());
//! assert_eq!(report.summary.info, 1);
//! ```

pub mod error;
pub mod report;
pub mod rules;
pub mod validator;

pub use error::{PolicyError, PolicyResult};
pub use report::{DiagnosticReport, ReportSummary};
pub use rules::{PolicyRules, StructuralRules};
pub use validator::Validator;
