//! Tool registry
//!
//! The closed set of tools mdq offers, narrowed once at startup to the
//! enabled subset.

use super::protocol::ToolDefinition;
use super::tools::{check_required, McpTool, MetaTool, SearchTool};
use crate::config::ToolSelection;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named tools, kept sorted by name
#[derive(Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn McpTool>>,
}

impl ToolRegistry {
    /// Registry over arbitrary tool implementations
    pub fn from_tools<I>(tools: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn McpTool>>,
    {
        let tools = tools.into_iter().map(|tool| (tool.name(), tool)).collect();
        Self { tools }
    }

    /// Every tool mdq ships, sharing one gateway
    pub fn all(gateway: Gateway) -> Self {
        Self::from_tools([
            Arc::new(SearchTool::new(gateway.clone())) as Arc<dyn McpTool>,
            Arc::new(MetaTool::new(gateway)),
        ])
    }

    /// Keep only the named tools. An empty list keeps everything; an
    /// unknown name is a configuration error.
    pub fn enabled(&self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self.clone());
        }

        let mut tools = BTreeMap::new();
        for name in names {
            let (key, tool) = self
                .tools
                .get_key_value(name.as_str())
                .ok_or_else(|| Error::UnknownTool(name.clone()))?;
            tools.insert(*key, Arc::clone(tool));
        }
        Ok(Self { tools })
    }

    /// Apply a [`ToolSelection`]
    pub fn select(&self, selection: &ToolSelection) -> Result<Self> {
        self.enabled(selection.names())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn McpTool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Definitions in sorted name order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate declared required arguments, then run the tool
    pub async fn call(&self, name: &str, args: &Value) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        check_required(tool.params(), args)?;
        tool.execute(args).await
    }
}
