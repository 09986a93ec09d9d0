//! Plugin registry.
//!
//! Maps each [`ResourceKind`] to its plugin. The registry is built once at
//! start-up and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use canvas_model::{EdgeRelationship, Graph, Node, ResourceCategory, ResourceKind};

use crate::error::{PluginError, PluginResult};
use crate::plugin::ResourcePlugin;
use crate::plugins::{
    AddressPlugin, BucketPlugin, CloudRunPlugin, ClusterPlugin, DnsZonePlugin, FirewallPlugin,
    InstancePlugin, NetworkPlugin, PubsubTopicPlugin, ServiceAccountPlugin, SqlInstancePlugin,
    SubnetworkPlugin,
};

/// The built-in plugin for `kind`. Adding a kind fails to compile here
/// until its plugin exists.
fn builtin_plugin(kind: ResourceKind) -> Arc<dyn ResourcePlugin> {
    match kind {
        ResourceKind::ComputeNetwork => Arc::new(NetworkPlugin),
        ResourceKind::ComputeSubnetwork => Arc::new(SubnetworkPlugin),
        ResourceKind::ComputeFirewall => Arc::new(FirewallPlugin),
        ResourceKind::ComputeAddress => Arc::new(AddressPlugin),
        ResourceKind::DnsManagedZone => Arc::new(DnsZonePlugin),
        ResourceKind::ComputeInstance => Arc::new(InstancePlugin),
        ResourceKind::StorageBucket => Arc::new(BucketPlugin),
        ResourceKind::ContainerCluster => Arc::new(ClusterPlugin),
        ResourceKind::SqlDatabaseInstance => Arc::new(SqlInstancePlugin),
        ResourceKind::CloudRunService => Arc::new(CloudRunPlugin),
        ResourceKind::ServiceAccount => Arc::new(ServiceAccountPlugin),
        ResourceKind::PubsubTopic => Arc::new(PubsubTopicPlugin),
    }
}

/// Registry of resource plugins, keyed by kind.
pub struct PluginRegistry {
    plugins: HashMap<ResourceKind, Arc<dyn ResourcePlugin>>,
    order: Vec<ResourceKind>,
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registry holding one built-in plugin per resource kind.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in ResourceKind::ALL {
            registry.insert(builtin_plugin(kind));
        }
        debug!("Registered {} built-in plugins", registry.len());
        registry
    }

    /// Registry from an explicit plugin list.
    ///
    /// Two plugins claiming the same kind is a configuration error.
    pub fn from_plugins(plugins: Vec<Arc<dyn ResourcePlugin>>) -> PluginResult<Self> {
        let mut registry = Self::new();
        for plugin in plugins {
            registry.register(plugin)?;
        }
        Ok(registry)
    }

    /// Register a plugin under its kind.
    pub fn register(&mut self, plugin: Arc<dyn ResourcePlugin>) -> PluginResult<()> {
        let kind = plugin.kind();
        if self.plugins.contains_key(&kind) {
            return Err(PluginError::DuplicatePlugin(kind));
        }
        self.insert(plugin);
        Ok(())
    }

    fn insert(&mut self, plugin: Arc<dyn ResourcePlugin>) {
        let kind = plugin.kind();
        debug!("Registering plugin: {} ({})", plugin.display_name(), kind);
        if self.plugins.insert(kind, plugin).is_none() {
            self.order.push(kind);
        }
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&dyn ResourcePlugin> {
        self.plugins.get(&kind).map(|p| p.as_ref())
    }

    pub fn get_required(&self, kind: ResourceKind) -> PluginResult<&dyn ResourcePlugin> {
        self.get(kind)
            .ok_or_else(|| PluginError::PluginNotFound(kind.to_string()))
    }

    /// Plugin for a node, `None` for unknown or unregistered kinds.
    pub fn for_node(&self, node: &Node) -> Option<&dyn ResourcePlugin> {
        node.resource_kind().and_then(|kind| self.get(kind))
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.plugins.contains_key(&kind)
    }

    /// All plugins in registration order.
    pub fn list(&self) -> Vec<&dyn ResourcePlugin> {
        self.order.iter().filter_map(|kind| self.get(*kind)).collect()
    }

    /// Plugins grouped by category in palette order. Empty categories are
    /// omitted.
    pub fn list_by_category(&self) -> Vec<(ResourceCategory, Vec<&dyn ResourcePlugin>)> {
        ResourceCategory::ALL
            .iter()
            .map(|category| {
                let members: Vec<_> = self
                    .list()
                    .into_iter()
                    .filter(|p| p.category() == *category)
                    .collect();
                (*category, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("kinds", &self.order)
            .finish()
    }
}

/// Relationship to use when drawing an edge from `from` to `to`.
///
/// The source plugin's first suggestion targeting the destination kind
/// wins; anything else is a plain dependency.
pub fn suggest_relationship(
    registry: &PluginRegistry,
    graph: &Graph,
    from: &Node,
    to: &Node,
) -> EdgeRelationship {
    let (Some(plugin), Some(target_kind)) = (registry.for_node(from), to.resource_kind()) else {
        return EdgeRelationship::DependsOn;
    };

    plugin
        .suggest_edges(from, graph)
        .into_iter()
        .find(|s| s.target_kind == target_kind)
        .map(|s| s.relationship)
        .unwrap_or_default()
}
