//! MCP server implementation
//!
//! Line-oriented JSON-RPC over stdio: one request per input line, one
//! response per output line, flushed immediately.

use super::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerCapabilities, ServerInfo, ToolResult,
    JSONRPC_VERSION, MCP_PROTOCOL_VERSION, METHOD_NOT_FOUND,
};
use super::registry::ToolRegistry;
use crate::config::ServerConfig;
use crate::gateway::Gateway;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// MCP server for mdq
///
/// Serves the enabled tools over the Model Context Protocol. The tool set
/// is fixed when the server is constructed.
pub struct McpServer {
    registry: ToolRegistry,
    initialized: AtomicBool,
}

impl McpServer {
    /// Build a server over a gateway, enabling the tools named in `config`
    pub fn new(gateway: Gateway, config: &ServerConfig) -> crate::Result<Self> {
        let registry = ToolRegistry::all(gateway).select(&config.tools)?;
        Ok(Self::with_registry(registry))
    }

    /// Create a server over an existing registry
    pub fn with_registry(registry: ToolRegistry) -> Self {
        Self {
            registry,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run the MCP server on stdio until EOF
    pub async fn run(&self) -> crate::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader`, writing responses to `writer`.
    ///
    /// Requests are handled strictly one at a time.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> crate::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!(
            "mdq MCP server started (protocol version {}, tools: {})",
            MCP_PROTOCOL_VERSION,
            self.registry.names().join(", ")
        );

        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    tracing::info!("EOF received, shutting down");
                    break;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    tracing::debug!("Received: {}", line);

                    if let Some(response) = self.handle_line(line).await {
                        let response_json = serde_json::to_string(&response)?;
                        writer.write_all(response_json.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;
                        tracing::debug!("Sent: {}", response_json);
                    }
                }
                Err(e) => {
                    tracing::error!("Read error: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Decode one input line and produce its response, if any
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Parse error: {}", e)),
                ));
            }
        };

        let id = recoverable_id(&value);
        let request = match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) if request.jsonrpc == JSONRPC_VERSION => request,
            Ok(request) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!(
                        "Unsupported jsonrpc version: {}",
                        request.jsonrpc
                    )),
                ));
            }
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a single JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            method if request.is_notification() && method.starts_with("notifications/") => {
                tracing::debug!("Ignoring notification: {}", method);
                return None;
            }
            method => Err(JsonRpcError::method_not_found(method)),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(error) => {
                tracing::warn!("{} failed: {}", request.method, error);
                JsonRpcResponse::error(request.id, error)
            }
        })
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Value {
        if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::warn!("initialize called more than once");
        }

        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default()
        })
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Value {
        json!({ "tools": self.registry.definitions() })
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params
            .as_ref()
            .filter(|p| p.is_object())
            .ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;

        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;

        if !self.registry.contains(tool_name) {
            return Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Unknown tool: {}", tool_name),
            ));
        }

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(args) if args.is_object() => args.clone(),
            Some(_) => return Err(JsonRpcError::invalid_params("arguments must be an object")),
        };

        let text = self
            .registry
            .call(tool_name, &arguments)
            .await
            .map_err(|e| JsonRpcError::internal_error(e.to_string()))?;

        serde_json::to_value(ToolResult::text(text))
            .map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }
}

/// The request id, when the value carries a usable one
fn recoverable_id(value: &Value) -> Option<Value> {
    match value.get("id") {
        Some(id @ (Value::String(_) | Value::Number(_))) => Some(id.clone()),
        _ => None,
    }
}
