//! Built-in resource plugins, one module per resource kind.

mod address;
mod bucket;
mod cloud_run;
mod cluster;
mod dns_zone;
mod firewall;
mod instance;
mod network;
mod pubsub;
mod service_account;
mod sql;
mod subnetwork;

pub use address::{AddressPlugin, AddressProperties};
pub use bucket::{BucketPlugin, BucketProperties};
pub use cloud_run::{CloudRunPlugin, CloudRunProperties};
pub use cluster::{ClusterPlugin, ClusterProperties};
pub use dns_zone::{DnsZonePlugin, DnsZoneProperties};
pub use firewall::{FirewallPlugin, FirewallProperties};
pub use instance::{InstancePlugin, InstanceProperties};
pub use network::{NetworkPlugin, NetworkProperties};
pub use pubsub::{PubsubTopicPlugin, PubsubTopicProperties};
pub use service_account::{ServiceAccountPlugin, ServiceAccountProperties};
pub use sql::{SqlInstancePlugin, SqlInstanceProperties};
pub use subnetwork::{SubnetworkPlugin, SubnetworkProperties};

#[cfg(test)]
pub(crate) mod test_support {
    use canvas_model::{Edge, EdgeRelationship, Graph, Node, ResourceKind};

    use crate::registry::PluginRegistry;

    /// A node of `kind` seeded with the built-in defaults.
    pub fn default_node(kind: ResourceKind, id: &str, name: &str) -> Node {
        let registry = PluginRegistry::builtin();
        let defaults = registry.get(kind).unwrap().defaults();
        Node::new(kind, name).with_id(id).with_properties(defaults)
    }

    pub fn attach(graph: Graph, from: &str, to: &str) -> Graph {
        graph.with_edge(Edge::new(from, to, EdgeRelationship::NetworkAttachment))
    }
}
