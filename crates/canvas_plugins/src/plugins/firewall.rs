//! Firewall rule.

use serde::{Deserialize, Serialize};

use canvas_model::{
    codes, AttrValue, ConfigBlock, Diagnostic, EdgeRelationship, Graph, NestedBlock, Node,
    Properties, ResourceCategory, ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, split_list,
    to_properties, EdgeSuggestion, FieldDescriptor, ResourcePlugin, Schema,
};

const OPEN_RANGE: &str = "0.0.0.0/0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallProperties {
    pub name: String,
    pub direction: String,
    pub priority: i64,
    pub protocol: String,
    /// Comma separated ports or ranges.
    pub ports: String,
    /// Comma separated CIDR ranges.
    pub source_ranges: String,
}

impl Default for FirewallProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            direction: "INGRESS".to_string(),
            priority: 1000,
            protocol: "tcp".to_string(),
            ports: "80,443".to_string(),
            source_ranges: OPEN_RANGE.to_string(),
        }
    }
}

pub struct FirewallPlugin;

impl ResourcePlugin for FirewallPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeFirewall
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Network
    }

    fn display_name(&self) -> &'static str {
        "Firewall Rule"
    }

    fn description(&self) -> &'static str {
        "VPC firewall rule controlling traffic"
    }

    fn icon(&self) -> &'static str {
        "shield"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Rule Name")
                .required()
                .placeholder("allow-http"),
            FieldDescriptor::select("direction", "Direction", &["INGRESS", "EGRESS"]),
            FieldDescriptor::number("priority", "Priority").describe("0 to 65535, lower wins"),
            FieldDescriptor::select("protocol", "Protocol", &["tcp", "udp", "icmp", "all"]),
            FieldDescriptor::string("ports", "Ports").placeholder("80,443"),
            FieldDescriptor::string("source_ranges", "Source Ranges")
                .describe("Comma separated CIDR ranges"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&FirewallProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: FirewallProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Firewall rule name is required");

        if split_list(&props.source_ranges).iter().any(|r| r == OPEN_RANGE) {
            diagnostics.push(
                Diagnostic::warning(
                    codes::OPEN_FIREWALL,
                    "Firewall allows traffic from any source (0.0.0.0/0)",
                )
                .for_node(&node.id)
                .on_field("source_ranges")
                .with_remediation("Restrict source ranges for production."),
            );
        }

        if !(0..=65535).contains(&props.priority) {
            diagnostics.push(
                Diagnostic::error(codes::INVALID_PRIORITY, "Priority must be between 0 and 65535")
                    .for_node(&node.id)
                    .on_field("priority"),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: FirewallProperties = properties_for_generation(node);

        let network: AttrValue = ctx
            .attached_reference(node, ResourceKind::ComputeNetwork, "name")
            .map(AttrValue::from)
            .unwrap_or_else(|| AttrValue::from("default"));

        let ranges_key = if props.direction == "EGRESS" {
            "destination_ranges"
        } else {
            "source_ranges"
        };

        let mut allow = NestedBlock::new("allow").attr("protocol", props.protocol.as_str());
        let ports = split_list(&props.ports);
        if !ports.is_empty() && !matches!(props.protocol.as_str(), "icmp" | "all") {
            allow = allow.attr("ports", AttrValue::strings(ports));
        }

        let block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("network", network)
            .attr("direction", props.direction.as_str())
            .attr("priority", props.priority)
            .attr(ranges_key, AttrValue::strings(split_list(&props.source_ranges)))
            .block(allow);

        vec![block]
    }

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        vec![EdgeSuggestion::new(
            ResourceKind::ComputeNetwork,
            EdgeRelationship::NetworkAttachment,
            "apply to VPC",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{attach, default_node};

    #[test]
    fn test_open_firewall_warning() {
        let node = default_node(ResourceKind::ComputeFirewall, "fw", "allow-web")
            .with_property("name", "allow-web")
            .with_property("priority", 70000);
        let graph = Graph::new().with_node(node.clone());

        let diagnostics = FirewallPlugin.validate(&node, &ValidationContext::new(&graph));
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code, codes::OPEN_FIREWALL);
        assert_eq!(diagnostics[0].field.as_deref(), Some("source_ranges"));
        assert_eq!(diagnostics[1].code, codes::INVALID_PRIORITY);
    }

    #[test]
    fn test_default_network_without_edge() {
        let node = default_node(ResourceKind::ComputeFirewall, "fw", "allow-web");
        let graph = Graph::new().with_node(node.clone());

        let blocks = FirewallPlugin.to_configuration(&node, &GeneratorContext::new(&graph));
        assert_eq!(blocks[0].get("network"), Some(&AttrValue::from("default")));

        let allow = blocks[0].nested("allow").unwrap();
        assert_eq!(allow.get("ports"), Some(&AttrValue::strings(["80", "443"])));
    }

    #[test]
    fn test_network_reference_and_icmp() {
        let vpc = default_node(ResourceKind::ComputeNetwork, "vpc", "core");
        let fw = default_node(ResourceKind::ComputeFirewall, "fw", "ping").with_property("protocol", "icmp");
        let graph = attach(Graph::new().with_node(vpc).with_node(fw.clone()), "fw", "vpc");

        let blocks = FirewallPlugin.to_configuration(&fw, &GeneratorContext::new(&graph));
        let network = blocks[0].get("network").and_then(|v| v.as_reference()).unwrap();
        assert_eq!(network.path(), "google_compute_network.core.name");
        assert!(blocks[0].nested("allow").unwrap().get("ports").is_none());
    }
}
