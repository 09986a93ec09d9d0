//! GKE cluster.

use serde::{Deserialize, Serialize};

use canvas_model::{
    codes, ConfigBlock, Diagnostic, EdgeRelationship, Graph, NestedBlock, Node, Properties,
    Reference, ResourceCategory, ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    EdgeSuggestion, FieldDescriptor, ResourcePlugin, Schema,
};

const HIGH_COST_NODE_COUNT: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterProperties {
    pub name: String,
    pub location: String,
    pub initial_node_count: i64,
    pub remove_default_node_pool: bool,
    pub deletion_protection: bool,
    pub node_machine_type: String,
    pub node_disk_size_gb: i64,
    pub enable_autopilot: bool,
    pub networking_mode: String,
    pub description: String,
}

impl Default for ClusterProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: "us-central1".to_string(),
            initial_node_count: 3,
            remove_default_node_pool: true,
            deletion_protection: false,
            node_machine_type: "e2-medium".to_string(),
            node_disk_size_gb: 50,
            enable_autopilot: false,
            networking_mode: "VPC_NATIVE".to_string(),
            description: String::new(),
        }
    }
}

pub struct ClusterPlugin;

impl ClusterPlugin {
    /// The cluster's network: a directly attached VPC, else the VPC of its
    /// subnet.
    fn network_reference(node: &Node, ctx: &GeneratorContext<'_>) -> Option<Reference> {
        ctx.attached_reference(node, ResourceKind::ComputeNetwork, "name")
            .or_else(|| {
                ctx.attached(node, ResourceKind::ComputeSubnetwork).and_then(|subnet| {
                    ctx.attached_reference(subnet, ResourceKind::ComputeNetwork, "name")
                })
            })
    }
}

impl ResourcePlugin for ClusterPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ContainerCluster
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Kubernetes
    }

    fn display_name(&self) -> &'static str {
        "GKE Cluster"
    }

    fn description(&self) -> &'static str {
        "Google Kubernetes Engine cluster"
    }

    fn icon(&self) -> &'static str {
        "helm"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Cluster Name").required().group("General"),
            FieldDescriptor::string("location", "Location")
                .required()
                .describe("Region for a regional cluster, zone for a zonal one")
                .group("General"),
            FieldDescriptor::number("initial_node_count", "Initial Node Count").group("Nodes"),
            FieldDescriptor::boolean("remove_default_node_pool", "Remove Default Pool").group("Nodes"),
            FieldDescriptor::boolean("deletion_protection", "Deletion Protection").group("General"),
            FieldDescriptor::select(
                "node_machine_type",
                "Node Machine Type",
                &["e2-medium", "e2-standard-2", "e2-standard-4", "n2-standard-4"],
            )
            .group("Nodes"),
            FieldDescriptor::number("node_disk_size_gb", "Node Disk Size (GB)").group("Nodes"),
            FieldDescriptor::boolean("enable_autopilot", "Autopilot").group("General"),
            FieldDescriptor::select("networking_mode", "Networking Mode", &["VPC_NATIVE", "ROUTES"])
                .group("Networking"),
            FieldDescriptor::string("description", "Description").group("General"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&ClusterProperties::default())
    }

    fn validate(&self, node: &Node, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: ClusterProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Cluster name is required");
        require(&mut diagnostics, node, "location", &props.location, "Location is required");

        let node_count = if props.initial_node_count == 0 {
            3
        } else {
            props.initial_node_count
        };
        if node_count >= HIGH_COST_NODE_COUNT && props.node_machine_type.contains("standard-4") {
            diagnostics.push(
                Diagnostic::warning(
                    codes::HIGH_COST_CLUSTER,
                    format!(
                        "{} nodes of {} may be expensive",
                        node_count, props.node_machine_type
                    ),
                )
                .for_node(&node.id)
                .on_field("initial_node_count")
                .with_remediation("Consider a smaller machine type or autoscaling."),
            );
        }

        if !ctx.is_attached_to(node, ResourceKind::ComputeSubnetwork) {
            diagnostics.push(
                Diagnostic::info(
                    codes::NO_CUSTOM_NETWORK,
                    "Cluster uses the default network. Connect a Subnet for custom networking.",
                )
                .for_node(&node.id),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: ClusterProperties = properties_for_generation(node);

        let mut block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("location", props.location.as_str())
            .attr("deletion_protection", props.deletion_protection)
            .attr("networking_mode", props.networking_mode.as_str())
            .attr_opt("network", Self::network_reference(node, ctx))
            .attr_opt(
                "subnetwork",
                ctx.attached_reference(node, ResourceKind::ComputeSubnetwork, "name"),
            );

        if !props.description.is_empty() {
            block = block.attr("description", props.description.as_str());
        }

        if props.enable_autopilot {
            block = block.attr("enable_autopilot", true);
        } else {
            block = block
                .attr("initial_node_count", props.initial_node_count)
                .attr("remove_default_node_pool", props.remove_default_node_pool)
                .block(
                    NestedBlock::new("node_config")
                        .attr("machine_type", props.node_machine_type.as_str())
                        .attr("disk_size_gb", props.node_disk_size_gb),
                );
        }

        vec![block]
    }

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        vec![
            EdgeSuggestion::new(
                ResourceKind::ComputeSubnetwork,
                EdgeRelationship::NetworkAttachment,
                "attach to subnet",
            ),
            EdgeSuggestion::new(
                ResourceKind::ComputeNetwork,
                EdgeRelationship::NetworkAttachment,
                "attach to VPC",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{attach, default_node};
    use canvas_model::AttrValue;

    #[test]
    fn test_high_cost_warning() {
        let node = default_node(ResourceKind::ContainerCluster, "gke", "prod")
            .with_property("name", "prod")
            .with_property("initial_node_count", 6)
            .with_property("node_machine_type", "n2-standard-4");
        let graph = Graph::new().with_node(node.clone());

        let found: Vec<_> = ClusterPlugin
            .validate(&node, &ValidationContext::new(&graph))
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(found, vec![codes::HIGH_COST_CLUSTER, codes::NO_CUSTOM_NETWORK]);
    }

    #[test]
    fn test_network_follows_subnet() {
        let vpc = default_node(ResourceKind::ComputeNetwork, "vpc", "core");
        let sub = default_node(ResourceKind::ComputeSubnetwork, "sub", "nodes");
        let gke = default_node(ResourceKind::ContainerCluster, "gke", "prod");
        let graph = Graph::new().with_node(vpc).with_node(sub).with_node(gke.clone());
        let graph = attach(attach(graph, "sub", "vpc"), "gke", "sub");

        let blocks = ClusterPlugin.to_configuration(&gke, &GeneratorContext::new(&graph));
        let network = blocks[0].get("network").and_then(|v| v.as_reference()).unwrap();
        let subnetwork = blocks[0].get("subnetwork").and_then(|v| v.as_reference()).unwrap();
        assert_eq!(network.path(), "google_compute_network.core.name");
        assert_eq!(subnetwork.path(), "google_compute_subnetwork.nodes.name");
        assert!(blocks[0].nested("node_config").is_some());
    }

    #[test]
    fn test_autopilot_drops_node_settings() {
        let gke = default_node(ResourceKind::ContainerCluster, "gke", "auto")
            .with_property("enable_autopilot", true);
        let graph = Graph::new().with_node(gke.clone());

        let blocks = ClusterPlugin.to_configuration(&gke, &GeneratorContext::new(&graph));
        assert_eq!(blocks[0].get("enable_autopilot"), Some(&AttrValue::Bool(true)));
        assert!(blocks[0].get("initial_node_count").is_none());
        assert!(blocks[0].nested("node_config").is_none());
    }
}
