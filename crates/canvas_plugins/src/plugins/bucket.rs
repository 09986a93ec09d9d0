//! Cloud Storage bucket.

use serde::{Deserialize, Serialize};

use canvas_model::{
    codes, ConfigBlock, Diagnostic, NestedBlock, Node, Properties, ResourceCategory, ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    name_or, properties_for_generation, properties_for_validation, require, to_properties,
    FieldDescriptor, ResourcePlugin, Schema,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketProperties {
    pub name: String,
    pub location: String,
    pub storage_class: String,
    pub uniform_bucket_level_access: bool,
    pub versioning: bool,
    pub force_destroy: bool,
    pub public_access_prevention: String,
}

impl Default for BucketProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: "US".to_string(),
            storage_class: "STANDARD".to_string(),
            uniform_bucket_level_access: true,
            versioning: false,
            force_destroy: false,
            public_access_prevention: "enforced".to_string(),
        }
    }
}

pub struct BucketPlugin;

impl ResourcePlugin for BucketPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::StorageBucket
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Storage
    }

    fn display_name(&self) -> &'static str {
        "Cloud Storage"
    }

    fn description(&self) -> &'static str {
        "Object storage bucket"
    }

    fn icon(&self) -> &'static str {
        "bucket"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Bucket Name")
                .required()
                .describe("Globally unique"),
            FieldDescriptor::select(
                "location",
                "Location",
                &[
                    "US",
                    "EU",
                    "ASIA",
                    "us-central1",
                    "us-east1",
                    "us-west1",
                    "europe-west1",
                    "asia-east1",
                ],
            ),
            FieldDescriptor::select(
                "storage_class",
                "Storage Class",
                &["STANDARD", "NEARLINE", "COLDLINE", "ARCHIVE"],
            ),
            FieldDescriptor::boolean("uniform_bucket_level_access", "Uniform Access"),
            FieldDescriptor::boolean("versioning", "Object Versioning"),
            FieldDescriptor::boolean("force_destroy", "Force Destroy")
                .describe("Delete objects when the bucket is destroyed"),
            FieldDescriptor::select(
                "public_access_prevention",
                "Public Access Prevention",
                &["enforced", "inherited"],
            ),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&BucketProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: BucketProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Bucket name is required");

        if props.public_access_prevention == "inherited" {
            diagnostics.push(
                Diagnostic::warning(
                    codes::PUBLIC_BUCKET_RISK,
                    "Public access prevention is not enforced",
                )
                .for_node(&node.id)
                .on_field("public_access_prevention")
                .with_remediation("Set public access prevention to \"enforced\"."),
            );
        }

        if !props.uniform_bucket_level_access {
            diagnostics.push(
                Diagnostic::warning(
                    codes::ACL_MODE,
                    "Fine-grained ACLs are enabled. Uniform access is recommended.",
                )
                .for_node(&node.id)
                .on_field("uniform_bucket_level_access"),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: BucketProperties = properties_for_generation(node);

        let mut block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("location", props.location.as_str())
            .attr("storage_class", props.storage_class.as_str())
            .attr("uniform_bucket_level_access", props.uniform_bucket_level_access)
            .attr("force_destroy", props.force_destroy)
            .attr("public_access_prevention", props.public_access_prevention.as_str());

        if props.versioning {
            block = block.block(NestedBlock::new("versioning").attr("enabled", true));
        }

        vec![block]
    }
}
