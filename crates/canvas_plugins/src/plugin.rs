//! The resource plugin contract and its schema description types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use canvas_model::{
    codes, ConfigBlock, Diagnostic, EdgeRelationship, Graph, Node, Properties, ResourceCategory,
    ResourceKind,
};

use crate::context::{GeneratorContext, ValidationContext};

/// Editor input type for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Select,
}

/// One editable property of a resource kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub required: bool,
    /// Filled from the plugin defaults by [`Schema::with_defaults`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<&'static str>,
}

impl FieldDescriptor {
    fn new(key: &'static str, field_type: FieldType, label: &'static str) -> Self {
        Self {
            key,
            field_type,
            label,
            description: None,
            required: false,
            default: None,
            options: Vec::new(),
            placeholder: None,
            group: None,
        }
    }

    pub fn string(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldType::String, label)
    }

    pub fn number(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldType::Number, label)
    }

    pub fn boolean(key: &'static str, label: &'static str) -> Self {
        Self::new(key, FieldType::Boolean, label)
    }

    pub fn select(key: &'static str, label: &'static str, options: &[&'static str]) -> Self {
        let mut field = Self::new(key, FieldType::Select, label);
        field.options = options.to_vec();
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }
}

/// Ordered field list for one resource kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Copy each field's default value out of `defaults`.
    pub fn with_defaults(mut self, defaults: &Properties) -> Self {
        for field in &mut self.fields {
            field.default = defaults.get(field.key).cloned();
        }
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }
}

/// A natural connection for a node of some kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeSuggestion {
    pub target_kind: ResourceKind,
    pub relationship: EdgeRelationship,
    pub label: &'static str,
}

impl EdgeSuggestion {
    pub fn new(target_kind: ResourceKind, relationship: EdgeRelationship, label: &'static str) -> Self {
        Self {
            target_kind,
            relationship,
            label,
        }
    }
}

/// Behaviour of one resource kind.
///
/// Plugins are stateless and must be safe to share across threads. All
/// graph access goes through the read-only contexts.
pub trait ResourcePlugin: Send + Sync {
    fn kind(&self) -> ResourceKind;

    fn category(&self) -> ResourceCategory;

    fn display_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn icon(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Initial property values for a new node. Contains every schema key.
    fn defaults(&self) -> Properties;

    /// Per-node diagnostics. Never fails; problems are reported, not raised.
    fn validate(&self, node: &Node, ctx: &ValidationContext<'_>) -> Vec<Diagnostic>;

    /// Configuration blocks for `node`. References to other nodes are
    /// resolved through `ctx` and emitted as reference values.
    fn to_configuration(&self, node: &Node, ctx: &GeneratorContext<'_>) -> Vec<ConfigBlock>;

    fn suggest_edges(&self, _node: &Node, _graph: &Graph) -> Vec<EdgeSuggestion> {
        Vec::new()
    }
}

/// Serialize a typed property struct into a property mapping.
pub(crate) fn to_properties<T: Serialize>(value: &T) -> Properties {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Properties::new(),
    }
}

/// Read a node's properties as `T`. Missing and null keys take defaults.
pub(crate) fn read_properties<T: DeserializeOwned>(node: &Node) -> Result<T, serde_json::Error> {
    let present: Properties = node
        .properties
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    serde_json::from_value(Value::Object(present))
}

/// Typed properties for validation, or the diagnostic explaining why not.
pub(crate) fn properties_for_validation<T: DeserializeOwned>(node: &Node) -> Result<T, Diagnostic> {
    read_properties(node).map_err(|e| {
        Diagnostic::error(
            codes::INVALID_PROPERTY,
            format!("Invalid properties on \"{}\": {}", node.name, e),
        )
        .for_node(&node.id)
        .with_remediation("Reset the property to a value of the expected type.")
    })
}

/// Typed properties for generation, falling back to defaults.
pub(crate) fn properties_for_generation<T: DeserializeOwned + Default>(node: &Node) -> T {
    read_properties(node).unwrap_or_else(|e| {
        warn!("Node {} has malformed properties, using defaults: {}", node.id, e);
        T::default()
    })
}

/// Push a REQUIRED_FIELD error when `value` is blank.
pub(crate) fn require(
    diagnostics: &mut Vec<Diagnostic>,
    node: &Node,
    field: &str,
    value: &str,
    message: &str,
) {
    if value.trim().is_empty() {
        diagnostics.push(
            Diagnostic::error(codes::REQUIRED_FIELD, message)
                .for_node(&node.id)
                .on_field(field),
        );
    }
}

/// `value` if non-blank, else the node's display name.
pub(crate) fn name_or<'a>(value: &'a str, node: &'a Node) -> &'a str {
    if value.trim().is_empty() {
        &node.name
    } else {
        value
    }
}

/// Split a comma separated list, dropping blank items.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: String,
        size: i64,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: String::new(),
                size: 20,
            }
        }
    }

    fn sample_node() -> Node {
        Node::new(ResourceKind::PubsubTopic, "sample").with_id("n1")
    }

    #[test]
    fn test_read_properties_fills_missing_and_null() {
        let node = sample_node().with_property("name", json!(null));
        let props: Sample = read_properties(&node).unwrap();
        assert_eq!(props, Sample::default());
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let node = sample_node().with_property("size", "big");
        let diagnostic = properties_for_validation::<Sample>(&node).unwrap_err();
        assert_eq!(diagnostic.code, codes::INVALID_PROPERTY);
        assert_eq!(diagnostic.node_id.as_deref(), Some("n1"));

        let fallback: Sample = properties_for_generation(&node);
        assert_eq!(fallback.size, 20);
    }

    #[test]
    fn test_schema_with_defaults() {
        let defaults = to_properties(&Sample::default());
        let schema = Schema::new(vec![
            FieldDescriptor::string("name", "Name").required(),
            FieldDescriptor::number("size", "Size"),
        ])
        .with_defaults(&defaults);

        assert_eq!(schema.field("size").unwrap().default, Some(json!(20)));
        assert!(schema.field("name").unwrap().required);
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["name", "size"]);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" 80, 443 ,,"), vec!["80", "443"]);
        assert!(split_list("").is_empty());
    }
}
