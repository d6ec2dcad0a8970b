//! Process configuration, fixed at startup

use crate::gateway::SpotlightConfig;
use std::path::PathBuf;

/// Environment variable overriding the `mdfind` binary
pub const ENV_MDFIND: &str = "MDQ_MDFIND";
/// Environment variable overriding the `mdls` binary
pub const ENV_MDLS: &str = "MDQ_MDLS";
/// Environment variable listing enabled tools
pub const ENV_TOOLS: &str = "MDQ_TOOLS";
/// Environment variable holding a tracing filter directive
pub const ENV_LOG: &str = "MDQ_LOG";

/// Default result cap for searches
pub const DEFAULT_LIMIT: i64 = 20;

/// Which tools the protocol server exposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl ToolSelection {
    /// Build from tool names; an empty list selects every tool
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .flat_map(|n| {
                n.as_ref()
                    .split(',')
                    .map(|part| part.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            ToolSelection::All
        } else {
            ToolSelection::Only(names)
        }
    }

    /// Requested names; empty for [`ToolSelection::All`]
    pub fn names(&self) -> &[String] {
        match self {
            ToolSelection::All => &[],
            ToolSelection::Only(names) => names,
        }
    }
}

/// Immutable protocol server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    pub tools: ToolSelection,
}

impl ServerConfig {
    pub fn new(tools: ToolSelection) -> Self {
        Self { tools }
    }
}

impl SpotlightConfig {
    /// Defaults, overridden by `MDQ_MDFIND` / `MDQ_MDLS`
    pub fn from_env() -> Self {
        let mut config = SpotlightConfig::default();
        if let Some(path) = std::env::var_os(ENV_MDFIND).filter(|v| !v.is_empty()) {
            config.mdfind = PathBuf::from(path);
        }
        if let Some(path) = std::env::var_os(ENV_MDLS).filter(|v| !v.is_empty()) {
            config.mdls = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_empty_means_all() {
        assert_eq!(ToolSelection::from_names(Vec::<String>::new()), ToolSelection::All);
        assert_eq!(ToolSelection::from_names([" , "]), ToolSelection::All);
    }

    #[test]
    fn test_selection_splits_commas() {
        let selection = ToolSelection::from_names(["search, meta", "search"]);
        assert_eq!(selection.names(), &["search", "meta", "search"]);
    }
}
