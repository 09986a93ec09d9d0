//! HCL rendering of configuration blocks.
//!
//! Output follows `terraform fmt` conventions: two-space indentation,
//! `=` aligned within each block, nested blocks after attributes.

use canvas_model::{AttrValue, BlockType, ConfigBlock, NestedBlock};

const INDENT: &str = "  ";

/// Renders [`ConfigBlock`]s as HCL text.
pub struct HclRenderer;

impl HclRenderer {
    /// Quote and escape a string literal, including `${` and `%{`
    /// template sequences.
    pub fn quote(value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        let mut chars = value.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '$' if chars.peek() == Some(&'{') => out.push_str("$$"),
                '%' if chars.peek() == Some(&'{') => out.push_str("%%"),
                c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
                _ => out.push(c),
            }
        }
        out.push('"');
        out
    }

    /// Render a single attribute value.
    pub fn value(value: &AttrValue) -> String {
        match value {
            AttrValue::String(s) => Self::quote(s),
            AttrValue::Number(n) => n.to_string(),
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::List(items) => {
                let items: Vec<String> = items.iter().map(Self::value).collect();
                format!("[{}]", items.join(", "))
            }
            AttrValue::Object(entries) if entries.is_empty() => "{}".to_string(),
            AttrValue::Object(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, Self::value(v)))
                    .collect();
                format!("{{ {} }}", entries.join(", "))
            }
            AttrValue::Reference(reference) => reference.path(),
            AttrValue::Expression(expr) => expr.clone(),
        }
    }

    /// Opening line of a top-level block, without the brace.
    fn header(block: &ConfigBlock) -> String {
        match block.block_type {
            BlockType::Terraform => "terraform".to_string(),
            BlockType::Resource => format!(
                "resource {} {}",
                Self::quote(block.resource_type.as_deref().unwrap_or_default()),
                Self::quote(&block.name)
            ),
            other => format!("{} {}", other.keyword(), Self::quote(&block.name)),
        }
    }

    fn body(
        out: &mut String,
        depth: usize,
        attributes: &[(String, AttrValue)],
        blocks: &[NestedBlock],
    ) {
        let indent = INDENT.repeat(depth);
        let width = attributes.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

        for (key, value) in attributes {
            out.push_str(&format!(
                "{}{:<width$} = {}\n",
                indent,
                key,
                Self::value(value),
                width = width
            ));
        }

        for (i, block) in blocks.iter().enumerate() {
            if i > 0 || !attributes.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("{}{} {{\n", indent, block.block_type));
            Self::body(out, depth + 1, &block.attributes, &block.blocks);
            out.push_str(&format!("{}}}\n", indent));
        }
    }

    /// Render one top-level block, ending with a newline.
    pub fn block(block: &ConfigBlock) -> String {
        let mut out = format!("{} {{\n", Self::header(block));
        Self::body(&mut out, 1, &block.attributes, &block.blocks);
        out.push_str("}\n");
        out
    }

    /// Render blocks separated by blank lines, with an optional comment
    /// header.
    pub fn file(blocks: &[ConfigBlock], header: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(header) = header {
            for line in header.lines() {
                out.push_str(&format!("# {}\n", line));
            }
            out.push('\n');
        }
        let rendered: Vec<String> = blocks.iter().map(Self::block).collect();
        out.push_str(&rendered.join("\n"));
        out
    }
}
