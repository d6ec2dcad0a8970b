//! `meta` tool

use super::{McpTool, ParamType, ToolArgs, ToolParam};
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use async_trait::async_trait;
use serde_json::Value;

const PARAMS: &[ToolParam] = &[ToolParam::required(
    "path",
    ParamType::String,
    "Absolute path of the file or folder",
)];

/// Every Spotlight attribute of one item
pub struct MetaTool {
    gateway: Gateway,
}

impl MetaTool {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl McpTool for MetaTool {
    fn name(&self) -> &'static str {
        "meta"
    }

    fn description(&self) -> &'static str {
        "Show all Spotlight metadata attributes for a single file, one 'attribute: value' per line."
    }

    fn params(&self) -> &'static [ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let path = crate::expand_tilde(ToolArgs::new(args).require_str("path")?);

        let gateway = self.gateway.clone();
        let lines = tokio::task::spawn_blocking(move || gateway.metadata(&path))
            .await
            .map_err(|e| Error::ExecutionFailed(format!("metadata task failed: {}", e)))??;

        Ok(lines.join("\n"))
    }
}
