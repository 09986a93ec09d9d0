//! Cloud SQL database instance.

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
pub struct SqlInstanceProperties {
    pub name: String,
    pub database_version: String,
    pub tier: String,
    pub region: String,
    pub deletion_protection: bool,
    pub availability_type: String,
}

impl Default for SqlInstanceProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            database_version: "POSTGRES_15".to_string(),
            tier: "db-f1-micro".to_string(),
            region: "us-central1".to_string(),
            deletion_protection: true,
            availability_type: "ZONAL".to_string(),
        }
    }
}

pub struct SqlInstancePlugin;

impl ResourcePlugin for SqlInstancePlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::SqlDatabaseInstance
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Database
    }

    fn display_name(&self) -> &'static str {
        "Cloud SQL"
    }

    fn description(&self) -> &'static str {
        "Managed relational database"
    }

    fn icon(&self) -> &'static str {
        "database"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Instance Name").required(),
            FieldDescriptor::select(
                "database_version",
                "Database Version",
                &[
                    "POSTGRES_15",
                    "POSTGRES_14",
                    "MYSQL_8_0",
                    "MYSQL_5_7",
                    "SQLSERVER_2022_STANDARD",
                ],
            ),
            FieldDescriptor::select(
                "tier",
                "Tier",
                &["db-f1-micro", "db-g1-small", "db-custom-2-7680", "db-custom-4-15360"],
            ),
            FieldDescriptor::string("region", "Region"),
            FieldDescriptor::boolean("deletion_protection", "Deletion Protection"),
            FieldDescriptor::select("availability_type", "Availability", &["ZONAL", "REGIONAL"]),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&SqlInstanceProperties::default())
    }

    fn validate(&self, node: &Node, _ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: SqlInstanceProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Instance name is required");

        if !props.deletion_protection {
            diagnostics.push(
                Diagnostic::warning(
                    codes::NO_DELETION_PROTECTION,
                    "Deletion protection is disabled",
                )
                .for_node(&node.id)
                .on_field("deletion_protection")
                .with_remediation("Enable deletion protection for production databases."),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: SqlInstanceProperties = properties_for_generation(node);

        let mut settings = NestedBlock::new("settings")
            .attr("tier", props.tier.as_str())
            .attr("availability_type", props.availability_type.as_str());

        if let Some(network) = ctx.attached_reference(node, ResourceKind::ComputeNetwork, "id") {
            settings = settings.block(
                NestedBlock::new("ip_configuration")
                    .attr("ipv4_enabled", false)
                    .attr("private_network", network),
            );
        }

        let block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("database_version", props.database_version.as_str())
            .attr("region", props.region.as_str())
            .attr("deletion_protection", props.deletion_protection)
            .block(settings);

        vec![block]
    }

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        vec![EdgeSuggestion::new(
            ResourceKind::ComputeNetwork,
            EdgeRelationship::NetworkAttachment,
            "private IP in VPC",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{attach, default_node};
    use canvas_model::AttrValue;

    #[test]
    fn test_deletion_protection_warning() {
        let node = default_node(ResourceKind::SqlDatabaseInstance, "db", "orders")
            .with_property("name", "orders")
            .with_property("deletion_protection", false);
        let graph = Graph::new().with_node(node.clone());

        let diagnostics = SqlInstancePlugin.validate(&node, &ValidationContext::new(&graph));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::NO_DELETION_PROTECTION);
    }

    #[test]
    fn test_settings_block() {
        let vpc = default_node(ResourceKind::ComputeNetwork, "vpc", "core");
        let db = default_node(ResourceKind::SqlDatabaseInstance, "db", "orders");
        let graph = attach(Graph::new().with_node(vpc).with_node(db.clone()), "db", "vpc");

        let blocks = SqlInstancePlugin.to_configuration(&db, &GeneratorContext::new(&graph));
        let settings = blocks[0].nested("settings").unwrap();
        assert_eq!(settings.get("tier"), Some(&AttrValue::from("db-f1-micro")));

        let ip = &settings.blocks[0];
        assert_eq!(ip.block_type, "ip_configuration");
        assert_eq!(
            ip.get("private_network").and_then(|v| v.as_reference()).map(|r| r.path()),
            Some("google_compute_network.core.id".to_string())
        );
    }
}
