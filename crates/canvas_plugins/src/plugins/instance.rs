//! Compute Engine virtual machine.

use std::sync::LazyLock;

use regex::Regex;
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

const MIN_DISK_GB: i64 = 10;
const MAX_DISK_GB: i64 = 65536;

static ZONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+-[a-z]+\d+-[a-z]$").expect("zone pattern compiles"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceProperties {
    pub name: String,
    pub machine_type: String,
    pub zone: String,
    pub boot_disk_image: String,
    pub boot_disk_size_gb: i64,
    pub boot_disk_type: String,
    pub can_ip_forward: bool,
    /// Comma separated network tags.
    pub tags: String,
    pub allow_stopping_for_update: bool,
    pub description: String,
}

impl Default for InstanceProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            machine_type: "e2-medium".to_string(),
            zone: "us-central1-a".to_string(),
            boot_disk_image: "debian-cloud/debian-12".to_string(),
            boot_disk_size_gb: 20,
            boot_disk_type: "pd-balanced".to_string(),
            can_ip_forward: false,
            tags: String::new(),
            allow_stopping_for_update: true,
            description: String::new(),
        }
    }
}

pub struct InstancePlugin;

impl ResourcePlugin for InstancePlugin {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    fn category(&self) -> ResourceCategory {
        ResourceCategory::Compute
    }

    fn display_name(&self) -> &'static str {
        "VM Instance"
    }

    fn description(&self) -> &'static str {
        "Compute Engine virtual machine"
    }

    fn icon(&self) -> &'static str {
        "server"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            FieldDescriptor::string("name", "Instance Name")
                .required()
                .placeholder("web-server")
                .group("General"),
            FieldDescriptor::select(
                "machine_type",
                "Machine Type",
                &[
                    "e2-micro",
                    "e2-small",
                    "e2-medium",
                    "e2-standard-2",
                    "e2-standard-4",
                    "e2-standard-8",
                    "n2-standard-2",
                    "n2-standard-4",
                ],
            )
            .group("General"),
            FieldDescriptor::string("zone", "Zone")
                .required()
                .placeholder("us-central1-a")
                .group("General"),
            FieldDescriptor::select(
                "boot_disk_image",
                "Boot Image",
                &[
                    "debian-cloud/debian-12",
                    "ubuntu-os-cloud/ubuntu-2404-lts-amd64",
                    "centos-cloud/centos-stream-9",
                    "cos-cloud/cos-stable",
                ],
            )
            .group("Boot Disk"),
            FieldDescriptor::number("boot_disk_size_gb", "Disk Size (GB)").group("Boot Disk"),
            FieldDescriptor::select(
                "boot_disk_type",
                "Disk Type",
                &["pd-standard", "pd-balanced", "pd-ssd"],
            )
            .group("Boot Disk"),
            FieldDescriptor::boolean("can_ip_forward", "IP Forwarding").group("Networking"),
            FieldDescriptor::string("tags", "Network Tags")
                .describe("Comma separated")
                .group("Networking"),
            FieldDescriptor::boolean("allow_stopping_for_update", "Allow Stopping for Update")
                .group("Advanced"),
            FieldDescriptor::string("description", "Description").group("Advanced"),
        ])
        .with_defaults(&self.defaults())
    }

    fn defaults(&self) -> Properties {
        to_properties(&InstanceProperties::default())
    }

    fn validate(&self, node: &Node, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let props: InstanceProperties = match properties_for_validation(node) {
            Ok(props) => props,
            Err(diagnostic) => return vec![diagnostic],
        };
        let mut diagnostics = Vec::new();

        require(&mut diagnostics, node, "name", &props.name, "Instance name is required");
        require(&mut diagnostics, node, "zone", &props.zone, "Zone is required");

        if !props.zone.is_empty() && !ZONE_RE.is_match(&props.zone) {
            diagnostics.push(
                Diagnostic::error(codes::INVALID_ZONE, format!("Invalid zone: {}", props.zone))
                    .for_node(&node.id)
                    .on_field("zone")
                    .with_remediation("Use a zone such as us-central1-a."),
            );
        }

        if !(MIN_DISK_GB..=MAX_DISK_GB).contains(&props.boot_disk_size_gb) {
            diagnostics.push(
                Diagnostic::error(
                    codes::INVALID_DISK_SIZE,
                    format!("Boot disk size must be between {} and {} GB", MIN_DISK_GB, MAX_DISK_GB),
                )
                .for_node(&node.id)
                .on_field("boot_disk_size_gb"),
            );
        }

        if !ctx.is_attached_to(node, ResourceKind::ComputeSubnetwork) {
            diagnostics.push(
                Diagnostic::warning(codes::NO_SUBNET, "VM is not connected to a subnet")
                    .for_node(&node.id)
                    .with_remediation("Connect this VM to a Subnet node."),
            );
        }

        diagnostics
    }

    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock> {
        let props: InstanceProperties = properties_for_generation(node);

        let boot_disk = NestedBlock::new("boot_disk").block(
            NestedBlock::new("initialize_params")
                .attr("image", props.boot_disk_image.as_str())
                .attr("size", props.boot_disk_size_gb)
                .attr("type", props.boot_disk_type.as_str()),
        );

        let mut interface = match ctx.attached_reference(node, ResourceKind::ComputeSubnetwork, "id") {
            Some(subnet) => NestedBlock::new("network_interface").attr("subnetwork", subnet),
            None => NestedBlock::new("network_interface").attr("network", "default"),
        };
        if let Some(address) = ctx.attached_reference(node, ResourceKind::ComputeAddress, "address") {
            interface = interface.block(NestedBlock::new("access_config").attr("nat_ip", address));
        }

        let mut block = ConfigBlock::resource(self.kind().as_str(), ctx.identifier(node))
            .attr("name", name_or(&props.name, node))
            .attr("machine_type", props.machine_type.as_str())
            .attr("zone", props.zone.as_str());

        let tags = split_list(&props.tags);
        if !tags.is_empty() {
            block = block.attr("tags", AttrValue::strings(tags));
        }
        if props.can_ip_forward {
            block = block.attr("can_ip_forward", true);
        }
        block = block.attr("allow_stopping_for_update", props.allow_stopping_for_update);
        if !props.description.is_empty() {
            block = block.attr("description", props.description.as_str());
        }

        vec![block.block(boot_disk).block(interface)]
    }

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        vec![
            EdgeSuggestion::new(
                ResourceKind::ComputeSubnetwork,
                EdgeRelationship::NetworkAttachment,
                "attach to subnet",
            ),
            EdgeSuggestion::new(
                ResourceKind::ComputeAddress,
                EdgeRelationship::DependsOn,
                "assign static IP",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{attach, default_node};
    use canvas_model::{Edge, Reference};

    #[test]
    fn test_zone_and_disk_validation() {
        let node = default_node(ResourceKind::ComputeInstance, "vm", "web")
            .with_property("name", "web")
            .with_property("zone", "central")
            .with_property("boot_disk_size_gb", 5);
        let graph = Graph::new().with_node(node.clone());

        let found: Vec<_> = InstancePlugin
            .validate(&node, &ValidationContext::new(&graph))
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(
            found,
            vec![codes::INVALID_ZONE, codes::INVALID_DISK_SIZE, codes::NO_SUBNET]
        );
    }

    #[test]
    fn test_zone_pattern() {
        assert!(ZONE_RE.is_match("us-central1-a"));
        assert!(ZONE_RE.is_match("europe-west4-b"));
        assert!(!ZONE_RE.is_match("us-central1"));
    }

    #[test]
    fn test_interface_references_subnet_and_address() {
        let sub = default_node(ResourceKind::ComputeSubnetwork, "sub", "app");
        let ip = default_node(ResourceKind::ComputeAddress, "ip", "web-ip");
        let vm = default_node(ResourceKind::ComputeInstance, "vm", "web").with_property("tags", "http, https");
        let graph = attach(
            Graph::new().with_node(sub).with_node(ip).with_node(vm.clone()),
            "vm",
            "sub",
        )
        .with_edge(Edge::new("vm", "ip", EdgeRelationship::DependsOn));

        let blocks = InstancePlugin.to_configuration(&vm, &GeneratorContext::new(&graph));
        let block = &blocks[0];
        assert_eq!(block.get("tags"), Some(&AttrValue::strings(["http", "https"])));

        let interface = block.nested("network_interface").unwrap();
        assert_eq!(
            interface.get("subnetwork"),
            Some(&AttrValue::Reference(Reference::new(
                "google_compute_subnetwork",
                "app",
                "id"
            )))
        );
        let nat_ip = interface.blocks[0].get("nat_ip").and_then(|v| v.as_reference()).unwrap();
        assert_eq!(nat_ip.path(), "google_compute_address.web-ip.address");

        let disk = block.nested("boot_disk").unwrap();
        assert_eq!(disk.blocks[0].get("size"), Some(&AttrValue::from(20i64)));
    }

    #[test]
    fn test_default_network_without_subnet() {
        let vm = default_node(ResourceKind::ComputeInstance, "vm", "web");
        let graph = Graph::new().with_node(vm.clone());

        let blocks = InstancePlugin.to_configuration(&vm, &GeneratorContext::new(&graph));
        let interface = blocks[0].nested("network_interface").unwrap();
        assert_eq!(interface.get("network"), Some(&AttrValue::from("default")));
        assert!(interface.blocks.is_empty());
    }
}
