//! Configuration blocks: the generator's intermediate representation.
//!
//! Plugins return [`ConfigBlock`]s; the renderer in `canvas_terraform`
//! turns them into text. Values that depend on another node's identity are
//! carried as [`Reference`] markers and only become dotted paths at render
//! time.

use serde::{Deserialize, Serialize};

/// Top-level declaration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Resource,
    Variable,
    Output,
    Provider,
    /// The `terraform { ... }` settings block.
    Terraform,
}

impl BlockType {
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockType::Resource => "resource",
            BlockType::Variable => "variable",
            BlockType::Output => "output",
            BlockType::Provider => "provider",
            BlockType::Terraform => "terraform",
        }
    }
}

/// "Substitute the generated identifier path of another node's attribute."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Resource type of the referenced node.
    pub resource_type: String,
    /// Generated identifier of the referenced node.
    pub identifier: String,
    pub attribute: String,
}

impl Reference {
    pub fn new(
        resource_type: impl Into<String>,
        identifier: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            attribute: attribute.into(),
        }
    }

    /// `type.identifier.attribute`
    pub fn path(&self) -> String {
        format!("{}.{}.{}", self.resource_type, self.identifier, self.attribute)
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<AttrValue>),
    /// Inline object, e.g. `limits = { cpu = "1" }`.
    Object(Vec<(String, AttrValue)>),
    Reference(Reference),
    /// Raw unquoted expression such as `var.region`.
    Expression(String),
}

impl AttrValue {
    pub fn expression(expr: impl Into<String>) -> Self {
        AttrValue::Expression(expr.into())
    }

    /// A list of string literals.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrValue::List(items.into_iter().map(|s| AttrValue::String(s.into())).collect())
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            AttrValue::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(value.into())
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Number(value.into())
    }
}

impl From<Reference> for AttrValue {
    fn from(value: Reference) -> Self {
        AttrValue::Reference(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(value: Vec<AttrValue>) -> Self {
        AttrValue::List(value)
    }
}

/// Insert or replace `key` keeping first-insertion order.
fn set_attr(attributes: &mut Vec<(String, AttrValue)>, key: String, value: AttrValue) {
    match attributes.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => attributes.push((key, value)),
    }
}

/// A nested sub-block such as `boot_disk { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBlock {
    pub block_type: String,
    pub attributes: Vec<(String, AttrValue)>,
    #[serde(default)]
    pub blocks: Vec<NestedBlock>,
}

impl NestedBlock {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            attributes: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        set_attr(&mut self.attributes, key.into(), value.into());
        self
    }

    pub fn block(mut self, block: NestedBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// One named top-level declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigBlock {
    pub block_type: BlockType,
    pub resource_type: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, AttrValue)>,
    #[serde(default)]
    pub blocks: Vec<NestedBlock>,
}

impl ConfigBlock {
    pub fn new(block_type: BlockType, resource_type: Option<String>, name: impl Into<String>) -> Self {
        Self {
            block_type,
            resource_type,
            name: name.into(),
            attributes: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn resource(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(BlockType::Resource, Some(resource_type.into()), name)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(BlockType::Variable, None, name)
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self::new(BlockType::Output, None, name)
    }

    pub fn provider(name: impl Into<String>) -> Self {
        Self::new(BlockType::Provider, None, name)
    }

    pub fn terraform_settings() -> Self {
        Self::new(BlockType::Terraform, None, "")
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        set_attr(&mut self.attributes, key.into(), value.into());
        self
    }

    /// Set `key` only when `value` is present.
    pub fn attr_opt<V: Into<AttrValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    pub fn block(mut self, block: NestedBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn nested(&self, block_type: &str) -> Option<&NestedBlock> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }
}

/// A generated output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_replaces_in_place() {
        let block = ConfigBlock::resource("google_pubsub_topic", "events")
            .attr("name", "events")
            .attr("labels", "x")
            .attr("name", "renamed");

        assert_eq!(block.attributes.len(), 2);
        assert_eq!(block.attributes[0].0, "name");
        assert_eq!(block.get("name"), Some(&AttrValue::from("renamed")));
    }

    #[test]
    fn test_reference_path() {
        let reference = Reference::new("google_compute_network", "vpc1", "id");
        assert_eq!(reference.path(), "google_compute_network.vpc1.id");
    }

    #[test]
    fn test_attr_opt_skips_none() {
        let block = ConfigBlock::output("ip").attr_opt("description", None::<String>);
        assert!(block.attributes.is_empty());
    }
}
