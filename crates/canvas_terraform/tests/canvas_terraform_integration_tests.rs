//! Integration tests for canvas_terraform

use std::fs;
use std::sync::Arc;

use canvas_model::{EdgeRelationship, Graph, Position, ResourceKind};
use canvas_plugins::PluginRegistry;
use canvas_terraform::{write_files, GeneratorConfig, TerraformGenerator};
use tempfile::tempdir;

fn registry() -> Arc<PluginRegistry> {
    Arc::new(PluginRegistry::builtin())
}

fn generator() -> TerraformGenerator {
    TerraformGenerator::new(registry()).with_config(GeneratorConfig::default().with_header(false))
}

/// Adds a node named `name` with plugin defaults and returns its id.
fn add(graph: &mut Graph, registry: &PluginRegistry, kind: ResourceKind, name: &str) -> String {
    let id = graph.add_node(kind, Position::default(), registry.get(kind).unwrap().defaults());
    graph.rename_node(&id, name).unwrap();
    id
}

fn sample_graph() -> Graph {
    let registry = registry();
    let mut graph = Graph::new();

    let vpc = add(&mut graph, &registry, ResourceKind::ComputeNetwork, "vpc1");
    let sub = add(&mut graph, &registry, ResourceKind::ComputeSubnetwork, "sub1");
    let vm = add(&mut graph, &registry, ResourceKind::ComputeInstance, "web");
    let ip = add(&mut graph, &registry, ResourceKind::ComputeAddress, "web-ip");
    let sa = add(&mut graph, &registry, ResourceKind::ServiceAccount, "runner");
    let run = add(&mut graph, &registry, ResourceKind::CloudRunService, "api");

    graph.add_edge(&sub, &vpc, EdgeRelationship::NetworkAttachment).unwrap();
    graph.add_edge(&vm, &sub, EdgeRelationship::NetworkAttachment).unwrap();
    graph.add_edge(&vm, &ip, EdgeRelationship::DependsOn).unwrap();
    graph.add_edge(&run, &sa, EdgeRelationship::DependsOn).unwrap();
    graph
}

#[test]
fn test_subnet_references_network_identifier() {
    let graph = sample_graph();
    let vpc_id = graph.nodes[0].id.clone();

    let files = generator().generate(&graph);
    let network = files.iter().find(|f| f.filename == "network.tf").unwrap();

    assert!(network.content.contains("= google_compute_network.vpc1.id"));
    assert!(!network.content.contains(&vpc_id));
}

#[test]
fn test_file_set_and_order() {
    let files = generator().generate(&sample_graph());
    let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "provider.tf",
            "variables.tf",
            "network.tf",
            "compute.tf",
            "serverless.tf",
            "security.tf",
            "outputs.tf"
        ]
    );

    let outputs = &files[6].content;
    assert!(outputs.contains("output \"web-ip_address\""));
    assert!(outputs.contains("= google_service_account.runner.email"));
}

#[test]
fn test_cross_references_render_unquoted() {
    let files = generator().generate(&sample_graph());
    let compute = files.iter().find(|f| f.filename == "compute.tf").unwrap();
    let serverless = files.iter().find(|f| f.filename == "serverless.tf").unwrap();

    assert!(compute.content.contains("= google_compute_subnetwork.sub1.id"));
    assert!(compute.content.contains("= google_compute_address.web-ip.address"));
    assert!(serverless
        .content
        .contains("service_account = google_service_account.runner.email"));
    assert!(!compute.content.contains("node_"));
}

#[test]
fn test_generation_is_idempotent() {
    let graph = sample_graph();
    let gen = generator();

    assert_eq!(gen.generate(&graph), gen.generate(&graph));
}

#[test]
fn test_write_generated_files() {
    let dir = tempdir().unwrap();
    let files = generator().generate(&sample_graph());

    let written = write_files(dir.path(), &files).unwrap();
    assert_eq!(written.len(), files.len());

    let provider = fs::read_to_string(dir.path().join("provider.tf")).unwrap();
    assert!(provider.contains("provider \"google\" {"));
}

#[test]
fn test_config_flows_into_variables() {
    let config = GeneratorConfig::default()
        .with_header(false)
        .with_project("acme-prod")
        .with_region("europe-west1");
    let files = TerraformGenerator::new(registry())
        .with_config(config)
        .generate(&Graph::new());

    assert!(files[1].content.contains("\"acme-prod\""));
    assert!(files[1].content.contains("\"europe-west1\""));
}
