//! Regional subnetwork inside a VPC.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use canvas_model::{
    codes, ConfigBlock, Diagnostic, EdgeRelationship, Graph, Node, Properties, ResourceCategory,
    ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    EdgeSuggestion, FieldDescriptor, ResourcePlugin, Schema,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubnetworkProperties {
    pub name: String,
    pub ip_cidr_range: String,
    pub region: String,
    pub private_ip_google_access: bool,
    pub purpose: String,
    pub description: String,
}

impl Default for SubnetworkProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            ip_cidr_range: "10.0.0.0/24".to_string(),
            region: "us-central1".to_string(),
            private_ip_google_access: true,
            purpose: "PRIVATE".to_string(),
            description: String::new(),
        }
    }
}

/// `a.b.c.d/n` with a valid IPv4 address and `n <= 32`.
fn is_valid_cidr(value: &str) -> bool {
    value.parse::<Ipv4Net>().is_ok()
}

pub struct SubnetworkPlugin;

impl ResourcePlugin for SubnetworkPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeSubnetwork
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Network
    }

    fn display_name(&self) -> &'static str {
        "Subnet"
    }

    fn description(&self) -> &'static str {
        "Regional subnetwork within a VPC"
    }

    fn icon(&self) -> &'static str {
        "subnet"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Subnet Name")
                .required()
                .placeholder("my-subnet"),
            FieldDescriptor::string("ip_cidr_range", "IP CIDR Range")
                .required()
                .placeholder("10.0.0.0/24"),
            FieldDescriptor::string("region", "Region").required(),
            FieldDescriptor::boolean("private_ip_google_access", "Private Google Access")
                .describe("Reach Google APIs without external IPs"),
            FieldDescriptor::select(
                "purpose",
                "Purpose",
                &["PRIVATE", "INTERNAL_HTTPS_LOAD_BALANCER", "REGIONAL_MANAGED_PROXY"],
            ),
            FieldDescriptor::string("description", "Description"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&SubnetworkProperties::default())
    }

    fn validate(&self, node: &Node, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: SubnetworkProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Subnet name is required");
        require(
            &mut diagnostics,
            node,
            "ip_cidr_range",
            &props.ip_cidr_range,
            "IP CIDR range is required",
        );
        require(&mut diagnostics, node, "region", &props.region, "Region is required");

        if !props.ip_cidr_range.trim().is_empty() && !is_valid_cidr(props.ip_cidr_range.trim()) {
            diagnostics.push(
                Diagnostic::error(
                    codes::INVALID_CIDR,
                    format!("Invalid CIDR range: {}", props.ip_cidr_range),
                )
                .for_node(&node.id)
                .on_field("ip_cidr_range")
                .with_remediation("Use the form 10.0.0.0/24."),
            );
        }

        if !ctx.is_attached_to(node, ResourceKind::ComputeNetwork) {
            diagnostics.push(
                Diagnostic::warning(codes::MISSING_VPC, "Subnet is not connected to a VPC network")
                    .for_node(&node.id)
                    .with_remediation("Draw an edge from this subnet to a VPC Network node."),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: SubnetworkProperties = properties_for_generation(node);

        let mut block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("ip_cidr_range", props.ip_cidr_range.as_str())
            .attr("region", props.region.as_str())
            .attr_opt(
                "network",
                ctx.attached_reference(node, ResourceKind::ComputeNetwork, "id"),
            );

        if props.private_ip_google_access {
            block = block.attr("private_ip_google_access", true);
        }
        if !props.purpose.is_empty() && props.purpose != "PRIVATE" {
            block = block.attr("purpose", props.purpose.as_str());
        }
        if !props.description.is_empty() {
            block = block.attr("description", props.description.as_str());
        }

        vec![block]
    }

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        vec![EdgeSuggestion::new(
            ResourceKind::ComputeNetwork,
            EdgeRelationship::NetworkAttachment,
            "attach to VPC",
        )]
    }
}
