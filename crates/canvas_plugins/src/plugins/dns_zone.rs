//! Cloud DNS managed zone.

use serde::{Deserialize, Serialize};

use canvas_model::{
    codes, ConfigBlock, Diagnostic, EdgeRelationship, Graph, NestedBlock, Node, Properties,
    ResourceCategory, ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    EdgeSuggestion, FieldDescriptor, ResourcePlugin, Schema,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsZoneProperties {
    pub name: String,
    pub dns_name: String,
    pub visibility: String,
    pub zone_description: String,
}

impl Default for DnsZoneProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            dns_name: String::new(),
            visibility: "public".to_string(),
            zone_description: String::new(),
        }
    }
}

pub struct DnsZonePlugin;

impl ResourcePlugin for DnsZonePlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::DnsManagedZone
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Network
    }

    fn display_name(&self) -> &'static str {
        "Cloud DNS Zone"
    }

    fn description(&self) -> &'static str {
        "Managed DNS zone"
    }

    fn icon(&self) -> &'static str {
        "globe"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Zone Name").required(),
            FieldDescriptor::string("dns_name", "DNS Name")
                .required()
                .placeholder("example.com.")
                .describe("Fully qualified, ending with a dot"),
            FieldDescriptor::select("visibility", "Visibility", &["public", "private"]),
            FieldDescriptor::string("zone_description", "Description"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&DnsZoneProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: DnsZoneProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Zone name is required");
        require(&mut diagnostics, node, "dns_name", &props.dns_name, "DNS name is required");

        if !props.dns_name.is_empty() && !props.dns_name.ends_with('.') {
            diagnostics.push(
                Diagnostic::warning(codes::INVALID_DNS_NAME, "DNS name should end with a dot")
                    .for_node(&node.id)
                    .on_field("dns_name")
                    .with_remediation(format!("Use \"{}.\".", props.dns_name)),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: DnsZoneProperties = properties_for_generation(node);
        let dns_name = if props.dns_name.is_empty() {
            "example.com."
        } else {
            props.dns_name.as_str()
        };

        let mut block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("dns_name", dns_name)
            .attr("visibility", props.visibility.as_str());

        if !props.zone_description.is_empty() {
            block = block.attr("description", props.zone_description.as_str());
        }

        if props.visibility == "private" {
            if let Some(network) =
                ctx.attached_reference(node, ResourceKind::ComputeNetwork, "id")
            {
                block = block.block(
                    NestedBlock::new("private_visibility_config")
                        .block(NestedBlock::new("networks").attr("network_url", network)),
                );
            }
        }

        vec![block]
    }

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        vec![EdgeSuggestion::new(
            ResourceKind::ComputeNetwork,
            EdgeRelationship::NetworkAttachment,
            "visible in VPC",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{attach, default_node};

    #[test]
    fn test_dns_name_needs_trailing_dot() {
        let node = default_node(ResourceKind::DnsManagedZone, "zone", "public")
            .with_property("name", "public")
            .with_property("dns_name", "example.com");
        let graph = Graph::new().with_node(node.clone());

        let diagnostics = DnsZonePlugin.validate(&node, &ValidationContext::new(&graph));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::INVALID_DNS_NAME);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_private_zone_binds_network() {
        let vpc = default_node(ResourceKind::ComputeNetwork, "vpc", "core");
        let zone = default_node(ResourceKind::DnsManagedZone, "zone", "internal")
            .with_property("visibility", "private")
            .with_property("dns_name", "internal.example.");
        let graph = attach(Graph::new().with_node(vpc).with_node(zone.clone()), "zone", "vpc");

        let blocks = DnsZonePlugin.to_configuration(&zone, &GeneratorContext::new(&graph));
        let config = blocks[0].nested("private_visibility_config").unwrap();
        let network = config.blocks[0]
            .get("network_url")
            .and_then(|v| v.as_reference())
            .unwrap();
        assert_eq!(network.path(), "google_compute_network.core.id");
    }
}
