//! `search` tool

use super::{McpTool, ParamType, ToolArgs, ToolParam};
use crate::config::DEFAULT_LIMIT;
use crate::error::{Error, Result};
use crate::format::{render, OutputFormat};
use crate::gateway::{Gateway, SearchRequest};
use crate::query::{compile, SortSpec};
use async_trait::async_trait;
use serde_json::Value;

const PARAMS: &[ToolParam] = &[
    ToolParam::required(
        "q",
        ParamType::String,
        "Query. Plain text matches file names. Shorthand: @name:glob, @name=exact, \
         @content:text, @kind:Folder, @type:public.plain-text, @tree:public.image, \
         @mod:DAYS, @created:DAYS, @size:>10M. Raw kMDItem... queries pass through.",
    ),
    ToolParam::optional(
        "in",
        ParamType::Array,
        "Directories to search in (default: everywhere)",
    ),
    ToolParam::optional(
        "n",
        ParamType::Integer,
        "Maximum number of results (default: 20, 0 for unlimited)",
    ),
    ToolParam::optional(
        "sort",
        ParamType::String,
        "Sort by name, date, size or created; prefix with '-' for descending",
    ),
    ToolParam::optional(
        "fmt",
        ParamType::String,
        "Output format: compact (default), full, paths or json",
    ),
];

/// Spotlight search over the shorthand query language
pub struct SearchTool {
    gateway: Gateway,
}

impl SearchTool {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl McpTool for SearchTool {
    fn name(&self) -> &'static str {
        "search"
    }

    fn description(&self) -> &'static str {
        "Search files on this machine through the Spotlight index. Returns matching paths \
         with size and modification date."
    }

    fn params(&self) -> &'static [ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: &Value) -> Result<String> {
        let args = ToolArgs::new(args);
        let query = compile(args.require_str("q")?);
        let scopes: Vec<_> = args
            .strings("in")
            .iter()
            .map(|s| crate::expand_tilde(s))
            .collect();
        let limit = args.int("n").unwrap_or(DEFAULT_LIMIT);
        let sort = args.str("sort").map(str::parse::<SortSpec>).transpose()?;
        let format = args
            .str("fmt")
            .map(str::parse::<OutputFormat>)
            .transpose()?
            .unwrap_or_default();

        let request = SearchRequest::new(query)
            .with_scopes(scopes)
            .with_limit(limit)
            .with_sort(sort);

        let gateway = self.gateway.clone();
        let results = tokio::task::spawn_blocking(move || gateway.execute(&request))
            .await
            .map_err(|e| Error::ExecutionFailed(format!("search task failed: {}", e)))??;

        render(&results, format)
    }
}
