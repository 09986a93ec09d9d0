//! Validation engine.

use std::sync::Arc;

use tracing::{debug, info};

use canvas_model::{codes, Diagnostic, Graph, Severity};
use canvas_plugins::{PluginRegistry, ValidationContext};

use crate::report::DiagnosticReport;
use crate::rules::{PolicyRules, StructuralRules};

/// Runs every validation phase over a graph snapshot.
///
/// Holds only the injected registry; a single validator may be shared and
/// called concurrently on different snapshots.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<PluginRegistry>,
}

impl Validator {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Per-node checks through each node's plugin.
    pub fn schema_phase(&self, graph: &Graph) -> Vec<Diagnostic> {
        let ctx = ValidationContext::new(graph);
        let mut diagnostics = Vec::new();

        for node in &graph.nodes {
            match self.registry.for_node(node) {
                Some(plugin) => diagnostics.extend(plugin.validate(node, &ctx)),
                None => {
                    debug!("No plugin for node {} of kind {}", node.id, node.kind);
                    diagnostics.push(
                        Diagnostic::error(
                            codes::UNKNOWN_RESOURCE,
                            format!("Unknown resource type: {}", node.kind),
                        )
                        .for_node(&node.id),
                    );
                }
            }
        }

        diagnostics
    }

    pub fn graph_phase(&self, graph: &Graph) -> Vec<Diagnostic> {
        StructuralRules::check(graph)
    }

    pub fn policy_phase(&self, graph: &Graph) -> Vec<Diagnostic> {
        PolicyRules::check(graph)
    }

    /// All diagnostics from all three phases. Never fails.
    pub fn validate_all(&self, graph: &Graph) -> Vec<Diagnostic> {
        let mut diagnostics = self.schema_phase(graph);
        diagnostics.extend(self.graph_phase(graph));
        diagnostics.extend(self.policy_phase(graph));

        let errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        info!(
            "Validated {} nodes, {} edges: {} diagnostics ({} errors)",
            graph.nodes.len(),
            graph.edges.len(),
            diagnostics.len(),
            errors
        );

        diagnostics
    }

    /// Validate and wrap the result for presentation.
    pub fn report(&self, graph: &Graph) -> DiagnosticReport {
        DiagnosticReport::new(self.validate_all(graph))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Arc::new(PluginRegistry::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_model::{Edge, EdgeRelationship, Node, ResourceKind};

    #[test]
    fn test_unknown_kind_reported() {
        let graph = Graph::new().with_node(Node::new("google_alloydb_cluster".to_string(), "db").with_id("x"));

        let diagnostics = Validator::default().schema_phase(&graph);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::UNKNOWN_RESOURCE);
        assert_eq!(diagnostics[0].node_id.as_deref(), Some("x"));
        assert!(diagnostics[0].message.contains("google_alloydb_cluster"));
    }

    #[test]
    fn test_phases_are_not_short_circuited() {
        let graph = Graph::new()
            .with_node(Node::new(ResourceKind::PubsubTopic, "a").with_id("a"))
            .with_node(Node::new(ResourceKind::PubsubTopic, "b").with_id("b"))
            .with_edge(Edge::new("a", "b", EdgeRelationship::DependsOn))
            .with_edge(Edge::new("b", "a", EdgeRelationship::DependsOn));

        let diagnostics = Validator::default().validate_all(&graph);
        let found: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();

        assert!(found.contains(&codes::REQUIRED_FIELD));
        assert!(found.contains(&codes::DEPENDENCY_CYCLE));
        let cycle = diagnostics.iter().find(|d| d.code == codes::DEPENDENCY_CYCLE).unwrap();
        assert!(cycle.node_id.is_none());
    }
}
