//! MCP tools exposed by mdq
//!
//! Each tool is one type implementing [`McpTool`]. Adding a tool means adding
//! a type here and listing it in [`crate::mcp::ToolRegistry::all`].

mod meta;
mod search;

pub use meta::MetaTool;
pub use search::SearchTool;

use super::protocol::ToolDefinition;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON Schema type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Array,
}

/// One declared tool parameter
#[derive(Debug, Clone, Copy)]
pub struct ToolParam {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
}

impl ToolParam {
    pub const fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
        }
    }
}

/// Trait for MCP tool implementations
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Stable tool name (e.g. "search")
    fn name(&self) -> &'static str;

    /// Free text shown to the calling agent
    fn description(&self) -> &'static str;

    /// Declared parameters
    fn params(&self) -> &'static [ToolParam];

    /// Run the tool. `args` is always a JSON object.
    async fn execute(&self, args: &Value) -> Result<String>;

    /// Definition advertised by `tools/list`
    fn definition(&self) -> ToolDefinition {
        let mut properties = Map::new();
        for param in self.params() {
            let mut schema = json!({
                "type": param.kind,
                "description": param.description,
            });
            if param.kind == ParamType::Array {
                schema["items"] = json!({ "type": "string" });
            }
            properties.insert(param.name.to_string(), schema);
        }

        let required: Vec<&str> = self
            .params()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }
}

/// Reject calls missing a declared required argument
pub fn check_required(params: &[ToolParam], args: &Value) -> Result<()> {
    for param in params.iter().filter(|p| p.required) {
        match args.get(param.name) {
            None | Some(Value::Null) => return Err(Error::MissingArgument(param.name.to_string())),
            Some(_) => {}
        }
    }
    Ok(())
}

/// Permissive view over tool arguments.
///
/// Accessors return `None` on a missing key or a type mismatch instead of
/// failing, so slightly-off agent input still gets a best-effort answer.
#[derive(Debug, Clone, Copy)]
pub struct ToolArgs<'a> {
    value: &'a Value,
}

impl<'a> ToolArgs<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Non-empty string argument
    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.value
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, name: &str) -> Result<&'a str> {
        self.str(name)
            .ok_or_else(|| Error::MissingArgument(name.to_string()))
    }

    /// Integer argument; numeric strings and whole floats are accepted
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.value.get(name)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String list from an array or a comma-separated string
    pub fn strings(&self, name: &str) -> Vec<String> {
        match self.value.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}
