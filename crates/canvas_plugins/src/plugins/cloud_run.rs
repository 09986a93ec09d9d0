//! Cloud Run service.

use serde::{Deserialize, Serialize};

use canvas_model::{
    AttrValue, ConfigBlock, Diagnostic, EdgeRelationship, Graph, NestedBlock, Node, Properties,
    ResourceCategory, ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    EdgeSuggestion, FieldDescriptor, ResourcePlugin, Schema,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudRunProperties {
    pub name: String,
    pub location: String,
    pub image: String,
    pub port: i64,
    pub max_instances: i64,
    pub cpu: String,
    pub memory: String,
}

impl Default for CloudRunProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: "us-central1".to_string(),
            image: String::new(),
            port: 8080,
            max_instances: 10,
            cpu: "1".to_string(),
            memory: "512Mi".to_string(),
        }
    }
}

pub struct CloudRunPlugin;

impl ResourcePlugin for CloudRunPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CloudRunService
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Serverless
    }

    fn display_name(&self) -> &'static str {
        "Cloud Run"
    }

    fn description(&self) -> &'static str {
        "Serverless container service"
    }

    fn icon(&self) -> &'static str {
        "rocket"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Service Name").required(),
            FieldDescriptor::string("location", "Location"),
            FieldDescriptor::string("image", "Container Image")
                .required()
                .placeholder("gcr.io/my-project/app:latest"),
            FieldDescriptor::number("port", "Container Port"),
            FieldDescriptor::number("max_instances", "Max Instances"),
            FieldDescriptor::select("cpu", "CPU", &["1", "2", "4", "8"]),
            FieldDescriptor::select("memory", "Memory", &["256Mi", "512Mi", "1Gi", "2Gi", "4Gi"]),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&CloudRunProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: CloudRunProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Service name is required");
        let before = diagnostics.len();
        require(&mut diagnostics, node, "image", &props.image, "Container image is required");
        if let Some(missing_image) = diagnostics.get_mut(before) {
            missing_image.remediation = Some("Specify a container image URL.".to_string());
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: CloudRunProperties = properties_for_generation(node);
        let image = if props.image.is_empty() {
            "us-docker.pkg.dev/cloudrun/container/hello"
        } else {
            props.image.as_str()
        };

        let container = NestedBlock::new("containers")
            .attr("image", image)
            .block(NestedBlock::new("ports").attr("container_port", props.port))
            .block(NestedBlock::new("resources").attr(
                "limits",
                AttrValue::Object(vec![
                    ("cpu".to_string(), AttrValue::from(props.cpu.as_str())),
                    ("memory".to_string(), AttrValue::from(props.memory.as_str())),
                ]),
            ));

        let mut template = NestedBlock::new("template");
        if let Some(account) = ctx.attached_reference(node, ResourceKind::ServiceAccount, "email") {
            template = template.attr("service_account", account);
        }
        let template = template
            .block(NestedBlock::new("scaling").attr("max_instance_count", props.max_instances))
            .block(container);

        let block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("location", props.location.as_str())
            .block(template);

        vec![block]
    }

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        vec![EdgeSuggestion::new(
            ResourceKind::ServiceAccount,
            EdgeRelationship::DependsOn,
            "run as service account",
        )]
    }
}
