//! Reserved static IP address.

use serde::{Deserialize, Serialize};

use canvas_model::{ConfigBlock, Diagnostic, Node, Properties, ResourceCategory, ResourceKind};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    FieldDescriptor, ResourcePlugin, Schema,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressProperties {
    pub name: String,
    pub address_type: String,
    pub region: String,
}

impl Default for AddressProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            address_type: "EXTERNAL".to_string(),
            region: "us-central1".to_string(),
        }
    }
}

pub struct AddressPlugin;

impl ResourcePlugin for AddressPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeAddress
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Network
    }

    fn display_name(&self) -> &'static str {
        "Static IP"
    }

    fn description(&self) -> &'static str {
        "Reserved static IP address"
    }

    fn icon(&self) -> &'static str {
        "pin"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Address Name").required(),
            FieldDescriptor::select("address_type", "Address Type", &["EXTERNAL", "INTERNAL"]),
            FieldDescriptor::string("region", "Region"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&AddressProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: AddressProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();
        require(&mut diagnostics, node, "name", &props.name, "Address name is required");
        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: AddressProperties = properties_for_generation(node);
        let identifier = ctx.identifier(node);

        let resource = ConfigBlock::resource(self.kind().as_str(), identifier.as_str())
            .attr("name", name_or(&props.name, node))
            .attr("address_type", props.address_type.as_str())
            .attr("region", props.region.as_str());

        let output = ConfigBlock::output(format!("{}_address", identifier))
            .attr("description", format!("Static IP address for {}", node.name))
            .attr_opt("value", ctx.reference(&node.id, "address"));

        vec![resource, output]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::default_node;
    use canvas_model::{BlockType, Graph};

    #[test]
    fn test_emits_address_output() {
        let node = default_node(ResourceKind::ComputeAddress, "ip", "web ip");
        let graph = Graph::new().with_node(node.clone());

        let blocks = AddressPlugin.to_configuration(&node, &GeneratorContext::new(&graph));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].block_type, BlockType::Output);
        assert_eq!(blocks[1].name, "web_ip_address");

        let value = blocks[1].get("value").and_then(|v| v.as_reference()).unwrap();
        assert_eq!(value.path(), "google_compute_address.web_ip.address");
    }
}
