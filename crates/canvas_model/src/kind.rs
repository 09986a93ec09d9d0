//! Resource kinds, categories and edge relationships.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The closed catalogue of resource kinds the canvas can model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "google_compute_network")]
    ComputeNetwork,
    #[serde(rename = "google_compute_subnetwork")]
    ComputeSubnetwork,
    #[serde(rename = "google_compute_firewall")]
    ComputeFirewall,
    #[serde(rename = "google_compute_address")]
    ComputeAddress,
    #[serde(rename = "google_dns_managed_zone")]
    DnsManagedZone,
    #[serde(rename = "google_compute_instance")]
    ComputeInstance,
    #[serde(rename = "google_storage_bucket")]
    StorageBucket,
    #[serde(rename = "google_container_cluster")]
    ContainerCluster,
    #[serde(rename = "google_sql_database_instance")]
    SqlDatabaseInstance,
    #[serde(rename = "google_cloud_run_v2_service")]
    CloudRunService,
    #[serde(rename = "google_service_account")]
    ServiceAccount,
    #[serde(rename = "google_pubsub_topic")]
    PubsubTopic,
}

impl ResourceKind {
    /// Every kind, in catalogue registration order.
    pub const ALL: [ResourceKind; 12] = [
        ResourceKind::ComputeNetwork,
        ResourceKind::ComputeSubnetwork,
        ResourceKind::ComputeFirewall,
        ResourceKind::ComputeAddress,
        ResourceKind::DnsManagedZone,
        ResourceKind::ComputeInstance,
        ResourceKind::StorageBucket,
        ResourceKind::ContainerCluster,
        ResourceKind::SqlDatabaseInstance,
        ResourceKind::CloudRunService,
        ResourceKind::ServiceAccount,
        ResourceKind::PubsubTopic,
    ];

    /// The provider resource type, also used as the wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ComputeNetwork => "google_compute_network",
            ResourceKind::ComputeSubnetwork => "google_compute_subnetwork",
            ResourceKind::ComputeFirewall => "google_compute_firewall",
            ResourceKind::ComputeAddress => "google_compute_address",
            ResourceKind::DnsManagedZone => "google_dns_managed_zone",
            ResourceKind::ComputeInstance => "google_compute_instance",
            ResourceKind::StorageBucket => "google_storage_bucket",
            ResourceKind::ContainerCluster => "google_container_cluster",
            ResourceKind::SqlDatabaseInstance => "google_sql_database_instance",
            ResourceKind::CloudRunService => "google_cloud_run_v2_service",
            ResourceKind::ServiceAccount => "google_service_account",
            ResourceKind::PubsubTopic => "google_pubsub_topic",
        }
    }

    /// Short label used when auto-naming new nodes, e.g. `compute-network`.
    pub fn label(&self) -> String {
        self.as_str()
            .trim_start_matches("google_")
            .replace('_', "-")
    }
}

impl FromStr for ResourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind tag carried by a node.
///
/// Graphs can be loaded from newer project files that name kinds this
/// build does not know. Those survive deserialization as `Unknown` so the
/// validator can flag them and the generator can skip them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Known(ResourceKind),
    Unknown(String),
}

impl NodeKind {
    /// The catalogue kind, if this build knows it.
    pub fn known(&self) -> Option<ResourceKind> {
        match self {
            NodeKind::Known(kind) => Some(*kind),
            NodeKind::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Known(kind) => kind.as_str(),
            NodeKind::Unknown(raw) => raw,
        }
    }
}

impl From<ResourceKind> for NodeKind {
    fn from(kind: ResourceKind) -> Self {
        NodeKind::Known(kind)
    }
}

impl From<String> for NodeKind {
    fn from(raw: String) -> Self {
        match raw.parse::<ResourceKind>() {
            Ok(kind) => NodeKind::Known(kind),
            Err(_) => NodeKind::Unknown(raw),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl PartialEq<ResourceKind> for NodeKind {
    fn eq(&self, other: &ResourceKind) -> bool {
        self.known() == Some(*other)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Palette/file grouping for resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceCategory {
    Network,
    Compute,
    Storage,
    Kubernetes,
    Database,
    Serverless,
    Security,
    Messaging,
}

impl ResourceCategory {
    /// Categories in fixed display order.
    pub const ALL: [ResourceCategory; 8] = [
        ResourceCategory::Network,
        ResourceCategory::Compute,
        ResourceCategory::Storage,
        ResourceCategory::Kubernetes,
        ResourceCategory::Database,
        ResourceCategory::Serverless,
        ResourceCategory::Security,
        ResourceCategory::Messaging,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Network => "Network",
            ResourceCategory::Compute => "Compute",
            ResourceCategory::Storage => "Storage",
            ResourceCategory::Kubernetes => "Kubernetes",
            ResourceCategory::Database => "Database",
            ResourceCategory::Serverless => "Serverless",
            ResourceCategory::Security => "Security",
            ResourceCategory::Messaging => "Messaging",
        }
    }

    /// File stem used for this category's generated configuration.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ResourceCategory::Network => "network",
            ResourceCategory::Compute => "compute",
            ResourceCategory::Storage => "storage",
            ResourceCategory::Kubernetes => "kubernetes",
            ResourceCategory::Database => "database",
            ResourceCategory::Serverless => "serverless",
            ResourceCategory::Security => "security",
            ResourceCategory::Messaging => "messaging",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relationship carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRelationship {
    #[default]
    DependsOn,
    NetworkAttachment,
    Contains,
}

impl EdgeRelationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeRelationship::DependsOn => "depends_on",
            EdgeRelationship::NetworkAttachment => "network_attachment",
            EdgeRelationship::Contains => "contains",
        }
    }
}

impl fmt::Display for EdgeRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
