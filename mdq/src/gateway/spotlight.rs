//! Spotlight engine driven through `mdfind` and `mdls`

use super::mdls::{self, MdAttribute, MdValue};
use super::{sort_results, SearchEngine, SearchRequest, SearchResult};
use crate::error::{Error, Result};
use crate::query::CompiledQuery;
use chrono::{DateTime, Utc};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Diagnostic `mdfind` prints when the query string is not valid
const QUERY_CREATION_FAILED: &str = "Failed to create query";

const ATTR_KIND: &str = "kMDItemKind";
const ATTR_CONTENT_TYPE: &str = "kMDItemContentType";

/// Paths handed to a single `mdls` invocation
const MDLS_BATCH: usize = 256;

/// Locations of the Spotlight command-line tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotlightConfig {
    pub mdfind: PathBuf,
    pub mdls: PathBuf,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            mdfind: PathBuf::from("mdfind"),
            mdls: PathBuf::from("mdls"),
        }
    }
}

/// [`SearchEngine`] over the local Spotlight index
#[derive(Debug, Clone, Default)]
pub struct Spotlight {
    config: SpotlightConfig,
}

impl Spotlight {
    pub fn new(config: SpotlightConfig) -> Self {
        Self { config }
    }

    fn mdfind(&self, query: &CompiledQuery, scopes: &[PathBuf], count: bool) -> Command {
        let mut cmd = Command::new(&self.config.mdfind);
        for scope in scopes {
            cmd.arg("-onlyin").arg(scope);
        }
        if count {
            cmd.arg("-count");
        } else {
            // NUL-terminated paths survive newlines in file names
            cmd.arg("-0");
        }
        cmd.arg(query.as_str());
        cmd
    }

    /// Stream matching paths, stopping early once `cap` paths are read
    fn collect_paths(&self, request: &SearchRequest, cap: Option<usize>) -> Result<Vec<String>> {
        let mut child = self
            .mdfind(&request.query, &request.scopes, false)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| launch_error(&self.config.mdfind, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ExecutionFailed("mdfind stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ExecutionFailed("mdfind stderr unavailable".to_string()))?;

        // stderr is drained alongside stdout so a full pipe cannot stall mdfind
        let stderr_reader = thread::spawn(move || {
            let mut text = String::new();
            if let Err(e) = BufReader::new(stderr).read_to_string(&mut text) {
                tracing::debug!(error = %e, "reading mdfind stderr failed");
            }
            text
        });

        let mut paths = Vec::new();
        for entry in BufReader::new(stdout).split(b'\0') {
            let entry = entry?;
            if entry.is_empty() || entry == b"\n" {
                continue;
            }
            paths.push(String::from_utf8_lossy(&entry).into_owned());

            if cap.is_some_and(|n| paths.len() >= n) {
                // Enough rows; the rest of the stream is not needed. The
                // stderr reader finishes on its own once the pipe closes.
                let _ = child.kill();
                let _ = child.wait();
                return Ok(paths);
            }
        }

        let status = child.wait()?;
        let stderr = stderr_reader.join().unwrap_or_default();
        check_mdfind(status.success(), &stderr)?;

        Ok(paths)
    }

    /// Fill kind and content type for rows that still exist on disk
    fn describe(&self, rows: &mut [SearchResult]) {
        let mut present: Vec<&mut SearchResult> = rows
            .iter_mut()
            .filter(|row| Path::new(&row.path).exists())
            .collect();

        for batch in present.chunks_mut(MDLS_BATCH) {
            self.describe_batch(batch);
        }
    }

    fn describe_batch(&self, rows: &mut [&mut SearchResult]) {
        let output = Command::new(&self.config.mdls)
            .args(["-name", ATTR_KIND, "-name", ATTR_CONTENT_TYPE])
            .args(rows.iter().map(|row| row.path.as_str()))
            .stdin(Stdio::null())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(error = %e, "mdls failed");
                return;
            }
        };

        let blocks = mdls::split_blocks(mdls::parse(&String::from_utf8_lossy(&output.stdout)));
        if blocks.len() != rows.len() {
            tracing::debug!(
                paths = rows.len(),
                blocks = blocks.len(),
                status = %output.status,
                "mdls output does not line up with paths, leaving kinds unset"
            );
            return;
        }

        for (row, attrs) in rows.iter_mut().zip(blocks) {
            row.kind = mdls::find(&attrs, ATTR_KIND)
                .and_then(MdValue::as_text)
                .map(String::from);
            if let Some(ct) = mdls::find(&attrs, ATTR_CONTENT_TYPE).and_then(MdValue::as_text) {
                row.content_type = ct.to_string();
            }
        }
    }
}

impl SearchEngine for Spotlight {
    fn execute(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        check_scopes(&request.scopes)?;

        // Ordering needs every candidate before the cap can apply
        let cap = match request.sort {
            Some(_) => None,
            None => request.limit,
        };
        let paths = self.collect_paths(request, cap)?;

        let mut rows: Vec<SearchResult> = paths.into_iter().map(stat).collect();
        if let Some(spec) = request.sort {
            sort_results(&mut rows, spec);
            if let Some(limit) = request.limit {
                rows.truncate(limit);
            }
        }

        self.describe(&mut rows);

        Ok(rows)
    }

    fn count(&self, query: &CompiledQuery, scopes: &[PathBuf]) -> Result<u64> {
        check_scopes(scopes)?;

        let output = self
            .mdfind(query, scopes, true)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| launch_error(&self.config.mdfind, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        check_mdfind(output.status.success(), &stderr)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.trim().parse::<u64>().map_err(|_| {
            Error::ExecutionFailed(format!("unexpected count output: {}", stdout.trim()))
        })
    }

    fn metadata(&self, path: &Path) -> Result<Vec<MdAttribute>> {
        if !path.exists() {
            return Err(Error::InvalidScope(path.display().to_string()));
        }

        let output = Command::new(&self.config.mdls)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| launch_error(&self.config.mdls, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InvalidScope(format!(
                "{}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        let attributes = mdls::parse(&String::from_utf8_lossy(&output.stdout));
        if attributes.is_empty() {
            return Err(Error::InvalidScope(format!(
                "{}: no metadata in index",
                path.display()
            )));
        }
        Ok(attributes)
    }
}

/// Every scope must be an existing directory
fn check_scopes(scopes: &[PathBuf]) -> Result<()> {
    for scope in scopes {
        if !scope.is_dir() {
            return Err(Error::ExecutionFailed(format!(
                "scope is not an accessible directory: {}",
                scope.display()
            )));
        }
    }
    Ok(())
}

fn check_mdfind(success: bool, stderr: &str) -> Result<()> {
    if stderr.contains(QUERY_CREATION_FAILED) {
        return Err(Error::QueryCreationFailed(stderr.trim().to_string()));
    }
    if !success {
        let message = if stderr.trim().is_empty() {
            "mdfind exited with an error".to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(Error::ExecutionFailed(message));
    }
    Ok(())
}

fn launch_error(program: &Path, e: std::io::Error) -> Error {
    Error::ExecutionFailed(format!("failed to launch {}: {}", program.display(), e))
}

/// Fill filesystem attributes for a path. Vanished files keep defaults.
fn stat(path: String) -> SearchResult {
    let mut row = SearchResult::from_path(path);
    match std::fs::metadata(&row.path) {
        Ok(meta) => {
            row.size = meta.len();
            row.modified = meta.modified().ok().map(DateTime::<Utc>::from);
            row.created = meta.created().ok().map(DateTime::<Utc>::from);
        }
        Err(e) => {
            tracing::debug!(path = %row.path, error = %e, "stat failed");
        }
    }
    row
}
