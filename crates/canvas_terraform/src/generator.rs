//! Graph to Terraform compilation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use canvas_graph::GraphEngine;
use canvas_model::{
    AttrValue, BlockType, ConfigBlock, GeneratedFile, Graph, NestedBlock, Node, ResourceCategory,
};
use canvas_plugins::{GeneratorContext, PluginRegistry};

use crate::config::GeneratorConfig;
use crate::render::HclRenderer;

const PROVIDER_SOURCE: &str = "hashicorp/google";
const HEADER: &str = "Generated by CloudCanvas. Changes will be overwritten on regeneration.";

/// Blocks collected from every renderable node, partitioned by destination.
#[derive(Debug, Default)]
pub struct CollectedBlocks {
    /// Resource blocks per category, in emission order.
    pub resources: HashMap<ResourceCategory, Vec<ConfigBlock>>,
    pub variables: Vec<ConfigBlock>,
    pub outputs: Vec<ConfigBlock>,
    /// Provider or settings blocks contributed by plugins.
    pub providers: Vec<ConfigBlock>,
    /// Nodes skipped for lack of a plugin.
    pub skipped: Vec<String>,
}

/// Compiles a graph into Terraform files.
#[derive(Debug, Clone)]
pub struct TerraformGenerator {
    registry: Arc<PluginRegistry>,
    config: GeneratorConfig,
}

impl TerraformGenerator {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Nodes in topological order, or insertion order when the graph has a
    /// cycle.
    pub fn emission_order<'a>(&self, graph: &'a Graph) -> Vec<&'a Node> {
        let sorted = GraphEngine::topological_sort(graph);
        if sorted.has_cycle {
            warn!(
                "Graph has a cycle through {:?}; emitting in insertion order",
                sorted.cycle_nodes
            );
            return graph.nodes.iter().collect();
        }
        sorted.order
    }

    /// Ask each node's plugin for its blocks.
    pub fn collect(&self, graph: &Graph) -> CollectedBlocks {
        let ctx = GeneratorContext::new(graph);
        let mut collected = CollectedBlocks::default();

        for node in self.emission_order(graph) {
            let Some(plugin) = self.registry.for_node(node) else {
                debug!("Skipping node {} with unknown kind {}", node.id, node.kind);
                collected.skipped.push(node.id.clone());
                continue;
            };

            for block in plugin.to_configuration(node, &ctx) {
                match block.block_type {
                    BlockType::Resource => collected
                        .resources
                        .entry(plugin.category())
                        .or_default()
                        .push(block),
                    BlockType::Variable => collected.variables.push(block),
                    BlockType::Output => collected.outputs.push(block),
                    BlockType::Provider | BlockType::Terraform => collected.providers.push(block),
                }
            }
        }

        collected
    }

    /// Generate the full file set. Never fails; unrenderable nodes are
    /// skipped.
    pub fn generate(&self, graph: &Graph) -> Vec<GeneratedFile> {
        let mut collected = self.collect(graph);
        let mut files = Vec::new();

        let mut provider_blocks = self.provider_blocks();
        provider_blocks.append(&mut collected.providers);
        files.push(self.file("provider.tf", &provider_blocks));

        let mut variable_blocks = self.variable_blocks();
        variable_blocks.append(&mut collected.variables);
        files.push(self.file("variables.tf", &variable_blocks));

        for category in ResourceCategory::ALL {
            if let Some(blocks) = collected.resources.get(&category) {
                files.push(self.file(&format!("{}.tf", category.file_stem()), blocks));
            }
        }

        if !collected.outputs.is_empty() {
            files.push(self.file("outputs.tf", &collected.outputs));
        }

        let resource_count: usize = collected.resources.values().map(Vec::len).sum();
        info!(
            "Generated {} files with {} resources ({} nodes skipped)",
            files.len(),
            resource_count,
            collected.skipped.len()
        );

        files
    }

    fn file(&self, filename: &str, blocks: &[ConfigBlock]) -> GeneratedFile {
        let header = self.config.emit_header.then_some(HEADER);
        GeneratedFile::new(filename, HclRenderer::file(blocks, header))
    }

    fn provider_blocks(&self) -> Vec<ConfigBlock> {
        let settings = ConfigBlock::terraform_settings()
            .attr("required_version", self.config.terraform_version.as_str())
            .block(NestedBlock::new("required_providers").attr(
                "google",
                AttrValue::Object(vec![
                    ("source".to_string(), AttrValue::from(PROVIDER_SOURCE)),
                    (
                        "version".to_string(),
                        AttrValue::from(self.config.provider_version.as_str()),
                    ),
                ]),
            ));

        let provider = ConfigBlock::provider("google")
            .attr("project", AttrValue::expression("var.project_id"))
            .attr("region", AttrValue::expression("var.region"));

        vec![settings, provider]
    }

    fn variable_blocks(&self) -> Vec<ConfigBlock> {
        vec![
            ConfigBlock::variable("project_id")
                .attr("description", "GCP project ID")
                .attr("type", AttrValue::expression("string"))
                .attr("default", self.config.project_id.as_str()),
            ConfigBlock::variable("region")
                .attr("description", "Default region")
                .attr("type", AttrValue::expression("string"))
                .attr("default", self.config.region.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_model::{Edge, EdgeRelationship, ResourceKind};

    fn generator() -> TerraformGenerator {
        TerraformGenerator::new(Arc::new(PluginRegistry::builtin()))
            .with_config(GeneratorConfig::default().with_header(false))
    }

    fn topic(id: &str) -> Node {
        Node::new(ResourceKind::PubsubTopic, id).with_id(id)
    }

    #[test]
    fn test_empty_graph_has_provider_and_variables() {
        let files = generator().generate(&Graph::new());
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["provider.tf", "variables.tf"]);

        let provider = &files[0].content;
        assert!(provider.contains("required_version = \">= 1.0\""));
        assert!(provider.contains("google = { source = \"hashicorp/google\", version = \"~> 6.0\" }"));
        assert!(provider.contains("project = var.project_id"));
        assert!(files[1].content.contains("default     = \"my-gcp-project\""));
    }

    #[test]
    fn test_cycle_falls_back_to_insertion_order() {
        let graph = Graph::new()
            .with_node(topic("zeta"))
            .with_node(topic("alpha"))
            .with_edge(Edge::new("zeta", "alpha", EdgeRelationship::DependsOn))
            .with_edge(Edge::new("alpha", "zeta", EdgeRelationship::DependsOn));

        let gen = generator();
        let order: Vec<_> = gen.emission_order(&graph).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha"]);

        let messaging = gen
            .generate(&graph)
            .into_iter()
            .find(|f| f.filename == "messaging.tf")
            .unwrap();
        let zeta = messaging.content.find("\"zeta\" {").unwrap();
        let alpha = messaging.content.find("\"alpha\" {").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_unknown_kind_skipped() {
        let graph = Graph::new()
            .with_node(Node::new("google_future_thing".to_string(), "x").with_id("x"))
            .with_node(topic("events"));

        let collected = generator().collect(&graph);
        assert_eq!(collected.skipped, vec!["x".to_string()]);
        assert_eq!(collected.resources[&ResourceCategory::Messaging].len(), 1);
    }

    #[test]
    fn test_header_toggle() {
        let with_header = TerraformGenerator::new(Arc::new(PluginRegistry::builtin()));
        let files = with_header.generate(&Graph::new());
        assert!(files[0].content.starts_with("# Generated by CloudCanvas"));

        let files = generator().generate(&Graph::new());
        assert!(files[0].content.starts_with("terraform {"));
    }
}
