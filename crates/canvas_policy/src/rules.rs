//! Structural and cross-resource rules.
//!
//! These checks look at the graph as a whole and never consult plugins.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use canvas_graph::GraphEngine;
use canvas_model::{codes, Diagnostic, Graph, ResourceKind};
use canvas_plugins::resource_identifier;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("identifier pattern compiles")
});

/// Graph phase checks.
pub struct StructuralRules;

impl StructuralRules {
    /// Run every structural check in order.
    pub fn check(graph: &Graph) -> Vec<Diagnostic> {
        let mut diagnostics = Self::cycles(graph);
        diagnostics.extend(Self::dangling_edges(graph));
        diagnostics.extend(Self::duplicate_names(graph));
        diagnostics.extend(Self::identifiers(graph));
        diagnostics
    }

    /// One graph-scoped `DEPENDENCY_CYCLE` error when any cycle exists.
    pub fn cycles(graph: &Graph) -> Vec<Diagnostic> {
        let report = GraphEngine::detect_cycle(graph);
        if !report.has_cycle {
            return Vec::new();
        }
        vec![Diagnostic::error(
            codes::DEPENDENCY_CYCLE,
            "Circular dependency detected in the graph. Please remove the cycle.",
        )
        .with_remediation("Check the edges between nodes and remove the circular reference.")]
    }

    /// One `DANGLING_EDGE` error per missing endpoint.
    pub fn dangling_edges(graph: &Graph) -> Vec<Diagnostic> {
        let ids = graph.node_ids();
        let mut diagnostics = Vec::new();

        for edge in &graph.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !ids.contains(endpoint.as_str()) {
                    diagnostics.push(
                        Diagnostic::error(
                            codes::DANGLING_EDGE,
                            format!("Edge references missing node: {}", endpoint),
                        )
                        .with_remediation(format!("Remove edge {} or restore the node.", edge.id)),
                    );
                }
            }
        }

        diagnostics
    }

    /// Same-kind collisions are errors against the later node; a name
    /// already taken by another kind is a warning.
    ///
    /// Same-kind names collide when they sanitise to the same Terraform
    /// identifier, so `my vpc` and `my_vpc` are duplicates.
    pub fn duplicate_names(graph: &Graph) -> Vec<Diagnostic> {
        let mut seen: HashSet<(&str, String)> = HashSet::new();
        let mut first_by_name: HashMap<&str, &str> = HashMap::new();
        let mut diagnostics = Vec::new();

        for node in &graph.nodes {
            let kind = node.kind.as_str();
            let name = node.name.as_str();
            let identifier = resource_identifier(name);

            if !seen.insert((kind, identifier.clone())) {
                let message = if identifier == name {
                    format!("Duplicate resource name \"{}\" for type {}", name, kind)
                } else {
                    format!(
                        "Resource name \"{}\" for type {} collides with another as identifier \"{}\"",
                        name, kind, identifier
                    )
                };
                diagnostics.push(
                    Diagnostic::error(codes::DUPLICATE_NAME, message)
                        .for_node(&node.id)
                        .on_field("name")
                        .with_remediation("Each resource of the same type must have a unique name."),
                );
                continue;
            }

            match first_by_name.get(name) {
                Some(other_kind) if *other_kind != kind => {
                    diagnostics.push(
                        Diagnostic::warning(
                            codes::DUPLICATE_NAME_CROSS_TYPE,
                            format!("Name \"{}\" is also used by a {} resource", name, other_kind),
                        )
                        .for_node(&node.id)
                        .on_field("name"),
                    );
                }
                Some(_) => {}
                None => {
                    first_by_name.insert(name, kind);
                }
            }
        }

        diagnostics
    }

    /// Names that cannot be used verbatim as identifiers.
    pub fn identifiers(graph: &Graph) -> Vec<Diagnostic> {
        graph
            .nodes
            .iter()
            .filter(|node| !IDENTIFIER_RE.is_match(&node.name))
            .map(|node| {
                Diagnostic::warning(
                    codes::INVALID_IDENTIFIER,
                    format!(
                        "Name \"{}\" is not a valid identifier and will be sanitised",
                        node.name
                    ),
                )
                .for_node(&node.id)
                .on_field("name")
                .with_remediation("Start with a letter and use only letters, digits, '-' and '_'.")
            })
            .collect()
    }
}

/// Policy phase heuristics.
pub struct PolicyRules;

impl PolicyRules {
    pub fn check(graph: &Graph) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if graph.is_empty() {
            diagnostics.push(Diagnostic::info(
                codes::EMPTY_GRAPH,
                "No resources added yet. Drag resources from the palette to get started.",
            ));
        }

        let has_subnet = graph.nodes_of_kind(ResourceKind::ComputeSubnetwork).next().is_some();
        let has_network = graph.nodes_of_kind(ResourceKind::ComputeNetwork).next().is_some();
        if has_subnet && !has_network {
            diagnostics.push(Diagnostic::warning(
                codes::SUBNET_WITHOUT_VPC,
                "Subnets exist without a VPC Network. Add a VPC and connect your subnets.",
            ));
        }

        diagnostics
    }
}
