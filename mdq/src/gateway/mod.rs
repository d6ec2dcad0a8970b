//! Search gateway
//!
//! Owns the lifecycle of one compiled-query execution against the native
//! engine. The engine itself sits behind [`SearchEngine`] so the protocol
//! server and CLI can be exercised without Spotlight.

pub mod mdls;
mod spotlight;

pub use spotlight::{Spotlight, SpotlightConfig};

use crate::error::Result;
use crate::query::{CompiledQuery, SortKey, SortSpec};
use chrono::{DateTime, Utc};
use mdls::MdAttribute;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One row returned by the native engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Absolute path
    pub path: String,
    /// File name
    pub name: String,
    /// Localized kind (e.g. "Folder")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Size in bytes
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Content type identifier (e.g. "public.plain-text")
    pub content_type: String,
}

impl SearchResult {
    /// Build a bare row for a path, with every other attribute unset
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&path)
            .to_string();
        Self {
            path,
            name,
            kind: None,
            size: 0,
            modified: None,
            created: None,
            content_type: String::new(),
        }
    }
}

/// A single execution request
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: CompiledQuery,
    /// Directories to search; empty means system-wide
    pub scopes: Vec<PathBuf>,
    /// Result cap; `None` means unlimited
    pub limit: Option<usize>,
    pub sort: Option<SortSpec>,
}

impl SearchRequest {
    pub fn new(query: CompiledQuery) -> Self {
        Self {
            query,
            scopes: Vec::new(),
            limit: None,
            sort: None,
        }
    }

    pub fn with_scopes<I, P>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Cap the result count. Zero or negative means unlimited.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = usize::try_from(limit).ok().filter(|&n| n > 0);
        self
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }
}

/// The external search engine boundary.
///
/// Implementations block the calling thread until results are collected.
pub trait SearchEngine: Send + Sync {
    /// Run a query, honoring scopes, limit and sort at the engine level
    fn execute(&self, request: &SearchRequest) -> Result<Vec<SearchResult>>;

    /// Count matches without materializing rows
    fn count(&self, query: &CompiledQuery, scopes: &[PathBuf]) -> Result<u64>;

    /// Every attribute the engine knows about one item, in engine order
    fn metadata(&self, path: &Path) -> Result<Vec<MdAttribute>>;
}

/// Shared, stateless handle over a [`SearchEngine`]
#[derive(Clone)]
pub struct Gateway {
    engine: Arc<dyn SearchEngine>,
}

impl Gateway {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self { engine }
    }

    /// Gateway backed by Spotlight's command-line tools
    pub fn spotlight(config: SpotlightConfig) -> Self {
        Self::new(Arc::new(Spotlight::new(config)))
    }

    /// Execute a compiled query
    pub fn execute(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        tracing::debug!(
            query = %request.query,
            scopes = ?request.scopes,
            limit = ?request.limit,
            sort = ?request.sort,
            "executing query"
        );
        if request.query.is_match_all() && request.scopes.is_empty() && request.limit.is_none() {
            tracing::warn!("unscoped, unlimited match-all query lists the whole index");
        }
        let results = self.engine.execute(request)?;
        tracing::debug!(count = results.len(), "query finished");
        Ok(results)
    }

    /// Count matches for a compiled query
    pub fn count(&self, query: &CompiledQuery, scopes: &[PathBuf]) -> Result<u64> {
        tracing::debug!(query = %query, scopes = ?scopes, "counting query");
        self.engine.count(query, scopes)
    }

    /// Render an item's attributes as `attribute: value` lines
    pub fn metadata(&self, path: &Path) -> Result<Vec<String>> {
        tracing::debug!(path = %path.display(), "loading metadata");
        let attributes = self.engine.metadata(path)?;
        Ok(mdls::render_lines(&attributes))
    }
}

/// Order rows by a sort spec. Ties fall back to path order.
pub fn sort_results(results: &mut [SearchResult], spec: SortSpec) {
    results.sort_by(|a, b| {
        let ordering = match spec.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Date => a.modified.cmp(&b.modified),
            SortKey::Size => a.size.cmp(&b.size),
            SortKey::Created => a.created.cmp(&b.created),
        };
        let ordering = ordering.then_with(|| a.path.cmp(&b.path));
        if spec.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
