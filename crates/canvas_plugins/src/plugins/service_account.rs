//! IAM service account.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use canvas_model::{
    codes, ConfigBlock, Diagnostic, Node, Properties, ResourceCategory, ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};
use crate::plugin::{
    properties_for_generation, properties_for_validation, require, to_properties,
    FieldDescriptor, ResourcePlugin, Schema,
};

/// 6 to 30 characters, lowercase letters, digits and hyphens.
static ACCOUNT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$").expect("account id pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccountProperties {
    pub account_id: String,
    pub display_name: String,
    pub sa_description: String,
}

pub struct ServiceAccountPlugin;

impl ResourcePlugin for ServiceAccountPlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ServiceAccount
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Security
    }

    fn display_name(&self) -> &'static str {
        "Service Account"
    }

    fn description(&self) -> &'static str {
        "IAM identity for workloads"
    }

    fn icon(&self) -> &'static str {
        "key"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("account_id", "Account ID")
                .required()
                .placeholder("my-service-account"),
            FieldDescriptor::string("display_name", "Display Name"),
            FieldDescriptor::string("sa_description", "Description"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&ServiceAccountProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: ServiceAccountProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "account_id", &props.account_id, "Account ID is required");

        if !props.account_id.is_empty() && !ACCOUNT_ID_RE.is_match(&props.account_id) {
            diagnostics.push(
                Diagnostic::error(
                    codes::INVALID_ACCOUNT_ID,
                    "Account ID must be 6-30 characters: lowercase letters, digits and hyphens",
                )
                .for_node(&node.id)
                .on_field("account_id"),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: ServiceAccountProperties = properties_for_generation(node);
        let identifier = ctx.identifier(node);
        let account_id = if props.account_id.is_empty() {
            identifier.as_str()
        } else {
            props.account_id.as_str()
        };
        let display_name = if props.display_name.is_empty() {
            node.name.as_str()
        } else {
            props.display_name.as_str()
        };

        let mut resource = ConfigBlock::resource(self.kind().as_str(), identifier.as_str())
            .attr("account_id", account_id)
            .attr("display_name", display_name);
        if !props.sa_description.is_empty() {
            resource = resource.attr("description", props.sa_description.as_str());
        }

        let output = ConfigBlock::output(format!("{}_email", identifier))
            .attr("description", format!("Email of service account {}", node.name))
            .attr_opt("value", ctx.reference(&node.id, "email"));

        vec![resource, output]
    }
}
