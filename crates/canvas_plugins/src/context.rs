//! Read-only views of the graph handed to plugins.

use std::collections::HashMap;

use canvas_model::{Graph, Node, Reference, ResourceKind};

/// Terraform-safe identifier for a node name.
///
/// Characters outside `[A-Za-z0-9_-]` become `_`, a name not starting with
/// a letter gets an `r_` prefix, and an empty name becomes `unnamed`.
pub fn resource_identifier(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    match cleaned.chars().next() {
        None => "unnamed".to_string(),
        Some(first) if first.is_ascii_alphabetic() => cleaned,
        Some(_) => format!("r_{}", cleaned),
    }
}

fn index(graph: &Graph) -> HashMap<&str, &Node> {
    graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
}

/// First target of an outgoing edge from `node_id` whose kind is `kind`.
fn first_attached<'a>(
    graph: &'a Graph,
    nodes: &HashMap<&'a str, &'a Node>,
    node_id: &str,
    kind: ResourceKind,
) -> Option<&'a Node> {
    graph
        .outgoing(node_id)
        .filter_map(|edge| nodes.get(edge.to.as_str()).copied())
        .find(|target| target.kind == kind)
}

/// Context for per-node validation.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    pub graph: &'a Graph,
    nodes: HashMap<&'a str, &'a Node>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            nodes: index(graph),
        }
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    pub fn attached(&self, node: &Node, kind: ResourceKind) -> Option<&'a Node> {
        first_attached(self.graph, &self.nodes, &node.id, kind)
    }

    pub fn is_attached_to(&self, node: &Node, kind: ResourceKind) -> bool {
        self.attached(node, kind).is_some()
    }
}

/// Context for configuration generation.
#[derive(Debug)]
pub struct GeneratorContext<'a> {
    pub graph: &'a Graph,
    nodes: HashMap<&'a str, &'a Node>,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            nodes: index(graph),
        }
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    pub fn attached(&self, node: &Node, kind: ResourceKind) -> Option<&'a Node> {
        first_attached(self.graph, &self.nodes, &node.id, kind)
    }

    /// Identifier the generator uses for `node`.
    pub fn identifier(&self, node: &Node) -> String {
        resource_identifier(&node.name)
    }

    /// Reference to `attribute` of the node with id `node_id`.
    ///
    /// `None` when the node does not exist.
    pub fn reference(&self, node_id: &str, attribute: &str) -> Option<Reference> {
        self.node(node_id).map(|target| {
            Reference::new(target.kind.as_str(), resource_identifier(&target.name), attribute)
        })
    }

    /// Reference to `attribute` of the first attached node of `kind`.
    pub fn attached_reference(
        &self,
        node: &Node,
        kind: ResourceKind,
        attribute: &str,
    ) -> Option<Reference> {
        self.attached(node, kind)
            .and_then(|target| self.reference(&target.id, attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_model::{Edge, EdgeRelationship};

    #[test]
    fn test_resource_identifier() {
        assert_eq!(resource_identifier("web-server"), "web-server");
        assert_eq!(resource_identifier("my vpc.prod"), "my_vpc_prod");
        assert_eq!(resource_identifier("1st"), "r_1st");
        assert_eq!(resource_identifier("  "), "unnamed");
        assert_eq!(resource_identifier("_private"), "r__private");
    }

    #[test]
    fn test_reference_and_attachment() {
        let graph = Graph::new()
            .with_node(Node::new(ResourceKind::ComputeNetwork, "main vpc").with_id("vpc"))
            .with_node(Node::new(ResourceKind::ComputeSubnetwork, "subnet").with_id("sub"))
            .with_edge(Edge::new("sub", "vpc", EdgeRelationship::NetworkAttachment));
        let ctx = GeneratorContext::new(&graph);

        let subnet = ctx.node("sub").unwrap();
        let reference = ctx
            .attached_reference(subnet, ResourceKind::ComputeNetwork, "id")
            .unwrap();
        assert_eq!(reference.path(), "google_compute_network.main_vpc.id");

        assert!(ctx.reference("missing", "id").is_none());
        assert!(ctx.attached(subnet, ResourceKind::ComputeAddress).is_none());

        let validation = ValidationContext::new(&graph);
        assert!(validation.is_attached_to(subnet, ResourceKind::ComputeNetwork));
        assert!(!validation.is_attached_to(validation.node("vpc").unwrap(), ResourceKind::ComputeNetwork));
    }
}
