//! Pub/Sub topic.

use serde::{Deserialize, Serialize};

use canvas_model::{ConfigBlock, Diagnostic, Node, Properties, ResourceCategory, ResourceKind};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    FieldDescriptor, ResourcePlugin, Schema,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PubsubTopicProperties {
    pub name: String,
    pub message_retention_duration: String,
}

impl Default for PubsubTopicProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            message_retention_duration: "86600s".to_string(),
        }
    }
}

pub struct PubsubTopicPlugin;

impl ResourcePlugin for PubsubTopicPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::PubsubTopic
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Messaging
    }

    fn display_name(&self) -> &'static str {
        "Pub/Sub Topic"
    }

    fn description(&self) -> &'static str {
        "Asynchronous messaging topic"
    }

    fn icon(&self) -> &'static str {
        "mail"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Topic Name").required(),
            FieldDescriptor::string("message_retention_duration", "Retention")
                .describe("Duration in seconds, e.g. 86600s"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&PubsubTopicProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: PubsubTopicProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();
        require(&mut diagnostics, node, "name", &props.name, "Topic name is required");
        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: PubsubTopicProperties = properties_for_generation(node);
        let mut block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node));
        if !props.message_retention_duration.is_empty() {
            block = block.attr(
                "message_retention_duration",
                props.message_retention_duration.as_str(),
            );
        }
        vec![block]
    }
}
