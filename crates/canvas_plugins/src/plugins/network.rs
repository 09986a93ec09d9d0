//! VPC network.

use serde::{Deserialize, Serialize};

use canvas_model::{
    codes, ConfigBlock, Diagnostic, Node, Properties, ResourceCategory, ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    FieldDescriptor, ResourcePlugin, Schema,
};

const DEFAULT_MTU: i64 = 1460;
const MAX_MTU: i64 = 8896;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkProperties {
    pub name: String,
    pub auto_create_subnetworks: bool,
    pub routing_mode: String,
    pub mtu: i64,
    pub delete_default_routes_on_create: bool,
    pub description: String,
}

impl Default for NetworkProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            auto_create_subnetworks: false,
            routing_mode: "REGIONAL".to_string(),
            mtu: DEFAULT_MTU,
            delete_default_routes_on_create: false,
            description: String::new(),
        }
    }
}

pub struct NetworkPlugin;

impl ResourcePlugin for NetworkPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeNetwork
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Network
    }

    fn display_name(&self) -> &'static str {
        "VPC Network"
    }

    fn description(&self) -> &'static str {
        "Virtual Private Cloud network"
    }

    fn icon(&self) -> &'static str {
        "network"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Network Name")
                .required()
                .placeholder("my-vpc")
                .group("General"),
            FieldDescriptor::boolean("auto_create_subnetworks", "Auto-create Subnets")
                .describe("Create one subnet per region automatically")
                .group("General"),
            FieldDescriptor::select("routing_mode", "Routing Mode", &["REGIONAL", "GLOBAL"])
                .group("Routing"),
            FieldDescriptor::number("mtu", "MTU")
                .describe("Maximum transmission unit, 1460 to 8896")
                .group("Advanced"),
            FieldDescriptor::boolean("delete_default_routes_on_create", "Delete Default Routes")
                .group("Routing"),
            FieldDescriptor::string("description", "Description").group("General"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&NetworkProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: NetworkProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "VPC network name is required");

        if props.mtu != 0 && !(DEFAULT_MTU..=MAX_MTU).contains(&props.mtu) {
            diagnostics.push(
                Diagnostic::error(
                    codes::INVALID_MTU,
                    format!("MTU must be between {} and {}", DEFAULT_MTU, MAX_MTU),
                )
                .for_node(&node.id)
                .on_field("mtu"),
            );
        }

        if props.auto_create_subnetworks {
            diagnostics.push(
                Diagnostic::info(
                    codes::AUTO_SUBNET_MODE,
                    "Auto-mode VPC creates subnets in every region. Consider custom mode for production.",
                )
                .for_node(&node.id)
                .on_field("auto_create_subnetworks"),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: NetworkProperties = properties_for_generation(node);
        let routing_mode = if props.routing_mode.is_empty() {
            "REGIONAL"
        } else {
            props.routing_mode.as_str()
        };

        let mut block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("auto_create_subnetworks", props.auto_create_subnetworks)
            .attr("routing_mode", routing_mode);

        if props.mtu != 0 && props.mtu != DEFAULT_MTU {
            block = block.attr("mtu", props.mtu);
        }
        if props.delete_default_routes_on_create {
            block = block.attr("delete_default_routes_on_create", true);
        }
        if !props.description.is_empty() {
            block = block.attr("description", props.description);
        }

        vec![block]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::default_node;
    use canvas_model::{AttrValue, Graph};
    use serde_json::json;

    #[test]
    fn test_defaults_require_name() {
        let node = default_node(ResourceKind::ComputeNetwork, "vpc", "main");
        let graph = Graph::new().with_node(node.clone());

        let diagnostics = NetworkPlugin.validate(&node, &ValidationContext::new(&graph));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::REQUIRED_FIELD);
        assert_eq!(diagnostics[0].field.as_deref(), Some("name"));
    }

    #[test]
    fn test_mtu_range_and_auto_mode() {
        let node = default_node(ResourceKind::ComputeNetwork, "vpc", "main")
            .with_property("name", "main")
            .with_property("mtu", 9000)
            .with_property("auto_create_subnetworks", true);
        let graph = Graph::new().with_node(node.clone());

        let found: Vec<_> = NetworkPlugin
            .validate(&node, &ValidationContext::new(&graph))
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(found, vec![codes::INVALID_MTU, codes::AUTO_SUBNET_MODE]);
    }

    #[test]
    fn test_configuration_skips_default_mtu() {
        let node = default_node(ResourceKind::ComputeNetwork, "vpc", "main vpc");
        let graph = Graph::new().with_node(node.clone());

        let blocks = NetworkPlugin.to_configuration(&node, &GeneratorContext::new(&graph));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "main_vpc");
        assert_eq!(blocks[0].get("name"), Some(&AttrValue::from("main vpc")));
        assert_eq!(blocks[0].get("routing_mode"), Some(&AttrValue::from("REGIONAL")));
        assert!(blocks[0].get("mtu").is_none());

        let custom = node.with_property("mtu", json!(1500));
        let blocks = NetworkPlugin.to_configuration(&custom, &GeneratorContext::new(&graph));
        assert_eq!(blocks[0].get("mtu"), Some(&AttrValue::from(1500i64)));
    }
}
