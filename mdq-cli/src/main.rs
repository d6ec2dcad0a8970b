//! mdq CLI - Spotlight search from the command line

use anyhow::Result;
use clap::{Parser, Subcommand};
use mdq::config::ENV_LOG;
use mdq::mcp::{McpServer, ToolRegistry};
use mdq::{
    compile, render, Gateway, OutputFormat, SearchRequest, ServerConfig, SortSpec,
    SpotlightConfig, ToolSelection, DEFAULT_LIMIT,
};
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mdq")]
#[command(
    author,
    version,
    about = "mdq - Spotlight search with a query shorthand for humans and agents"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (stderr)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for files
    Search {
        /// Shorthand query (e.g. "@content:TODO @mod:7 notes") or a raw kMDItem query
        query: String,

        /// Directories to search in (repeat or comma-separate)
        #[arg(long = "in", value_name = "DIR", value_delimiter = ',')]
        scopes: Vec<String>,

        /// Maximum number of results (0 for unlimited)
        #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
        limit: i64,

        /// Sort by name, date, size or created; prefix with '-' for descending
        #[arg(long, short = 's', allow_hyphen_values = true)]
        sort: Option<String>,

        /// Output format (compact, full, paths, json)
        #[arg(long, short = 'f', default_value = "compact")]
        fmt: String,
    },

    /// Count matching files
    Count {
        /// Shorthand or raw query
        query: String,

        /// Directories to search in (repeat or comma-separate)
        #[arg(long = "in", value_name = "DIR", value_delimiter = ',')]
        scopes: Vec<String>,
    },

    /// Show all Spotlight attributes of a file
    Meta {
        /// File or folder path
        path: String,
    },

    /// Print the tool schemas the MCP server advertises
    Schema {
        /// Only include these tools (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tools: Vec<String>,
    },

    /// Start MCP server (Model Context Protocol) over stdio
    Mcp {
        /// Only enable these tools (comma-separated)
        #[arg(long, env = "MDQ_TOOLS", value_delimiter = ',')]
        tools: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results and protocol frames
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let gateway = Gateway::spotlight(SpotlightConfig::from_env());

    match command {
        Commands::Search {
            query,
            scopes,
            limit,
            sort,
            fmt,
        } => cmd_search(&gateway, &query, &scopes, limit, sort.as_deref(), &fmt),
        Commands::Count { query, scopes } => cmd_count(&gateway, &query, &scopes),
        Commands::Meta { path } => cmd_meta(&gateway, &path),
        Commands::Schema { tools } => cmd_schema(gateway, &tools),
        Commands::Mcp { tools } => cmd_mcp(gateway, &tools).await,
    }
}

fn cmd_search(
    gateway: &Gateway,
    query: &str,
    scopes: &[String],
    limit: i64,
    sort: Option<&str>,
    fmt: &str,
) -> Result<()> {
    let sort = sort.map(str::parse::<SortSpec>).transpose()?;
    let format: OutputFormat = fmt.parse()?;

    let compiled = compile(query);
    tracing::debug!("Compiled query: {}", compiled);

    let request = SearchRequest::new(compiled)
        .with_scopes(expand_scopes(scopes))
        .with_limit(limit)
        .with_sort(sort);

    let results = gateway.execute(&request)?;
    tracing::debug!("Found {} results", results.len());
    print_output(&render(&results, format)?);
    Ok(())
}

fn cmd_count(gateway: &Gateway, query: &str, scopes: &[String]) -> Result<()> {
    let compiled = compile(query);
    let scopes = expand_scopes(scopes);
    tracing::debug!("Counting {} in {:?}", compiled, scopes);

    let count = gateway.count(&compiled, &scopes)?;
    println!("{}", count);
    Ok(())
}

fn cmd_meta(gateway: &Gateway, path: &str) -> Result<()> {
    let lines = gateway.metadata(&mdq::expand_tilde(path))?;
    print_output(&lines.join("\n"));
    Ok(())
}

fn cmd_schema(gateway: Gateway, tools: &[String]) -> Result<()> {
    let registry = ToolRegistry::all(gateway).select(&ToolSelection::from_names(tools))?;
    let payload = json!({ "tools": registry.definitions() });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn cmd_mcp(gateway: Gateway, tools: &[String]) -> Result<()> {
    let config = ServerConfig::new(ToolSelection::from_names(tools));
    let server = McpServer::new(gateway, &config)?;
    tracing::info!("Starting MCP server with tools: {}", server.registry().names().join(", "));
    server.run().await?;
    Ok(())
}

fn expand_scopes(scopes: &[String]) -> Vec<std::path::PathBuf> {
    scopes
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(mdq::expand_tilde)
        .collect()
}

fn print_output(text: &str) {
    if !text.is_empty() {
        println!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["mdq", "search", "notes"]).unwrap();
        match cli.command {
            Commands::Search {
                query,
                scopes,
                limit,
                sort,
                fmt,
            } => {
                assert_eq!(query, "notes");
                assert!(scopes.is_empty());
                assert_eq!(limit, 20);
                assert!(sort.is_none());
                assert_eq!(fmt, "compact");
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_search_flags() {
        let cli = Cli::try_parse_from([
            "mdq", "search", "@mod:7", "--in", "/tmp,/var", "--in", "~/src", "-n", "-1",
            "--sort", "-size", "--fmt", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Search {
                scopes,
                limit,
                sort,
                fmt,
                ..
            } => {
                assert_eq!(scopes, vec!["/tmp", "/var", "~/src"]);
                assert_eq!(limit, -1);
                assert_eq!(sort.as_deref(), Some("-size"));
                assert_eq!(fmt, "json");
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_mcp_tools() {
        let cli = Cli::try_parse_from(["mdq", "mcp", "--tools", "search"]).unwrap();
        match cli.command {
            Commands::Mcp { tools } => assert_eq!(tools, vec!["search"]),
            _ => panic!("expected mcp"),
        }
    }

    #[test]
    fn test_expand_scopes_skips_blanks() {
        let scopes = expand_scopes(&["/tmp".to_string(), " ".to_string()]);
        assert_eq!(scopes, vec![std::path::PathBuf::from("/tmp")]);
    }
}
