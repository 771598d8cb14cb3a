//! The stdio server loop.
//!
//! Reads line-delimited JSON-RPC from stdin, routes each message, and
//! writes at most one response line to stdout per request. Stdout carries
//! protocol frames only; all diagnostics go to stderr via `tracing`.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::dispatch::{dispatch_create, dispatch_read};
use super::protocol::{
    CallToolParams, CallToolResult, CancelledParams, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, MCPInitializeResult, MCPServerCapabilities, MCPServerInfo,
    RequestId,
};
use super::tools::{tool_descriptors, CREATE_TOOL, READ_TOOL};
use crate::graph::OneNoteApi;
use crate::{PROTOCOL_VERSION, SERVER_NAME, VERSION};

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Error types for the server loop.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("stdio error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The OneNote MCP server.
///
/// Owns the OneNote client and processes one request to completion before
/// the next line is read, so tool calls never interleave.
pub struct OneNoteMcpServer<C> {
    /// Backing OneNote API
    client: C,
}

impl<C: OneNoteApi> OneNoteMcpServer<C> {
    /// Create a server over the given OneNote client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Get the backing client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run the server until stdin closes or Ctrl-C arrives.
    pub async fn serve(&mut self) -> ServerResult<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };

                    if let Some(response) = self.handle_line(&line).await? {
                        stdout.write_all(response.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;
                        debug!("Sent response: {response}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process one input line. Returns the serialized response, or `None`
    /// for notifications and blank lines.
    pub async fn handle_line(&mut self, line: &str) -> ServerResult<Option<String>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        debug!("Received: {line}");

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(_) => {
                let response =
                    JsonRpcResponse::error(RequestId::Null, JsonRpcError::parse_error());
                return Ok(Some(serde_json::to_string(&response)?));
            }
        };

        match self.handle_request(request).await? {
            Some(response) => Ok(Some(serde_json::to_string(&response)?)),
            None => Ok(None),
        }
    }

    async fn handle_request(
        &mut self,
        request: JsonRpcRequest,
    ) -> ServerResult<Option<JsonRpcResponse>> {
        let JsonRpcRequest { id, method, params, .. } = request;
        debug!("Handling method: {method}");

        match method.as_str() {
            "initialize" => Ok(Some(self.handle_initialize(id)?)),
            "initialized" => Ok(None),
            "notifications/initialized" => {
                info!("Client initialized");
                Ok(None)
            }
            "tools/list" => Ok(Some(self.handle_list_tools(id)?)),
            "tools/call" => Ok(Some(self.handle_tool_call(id, params).await?)),
            "notifications/cancelled" => {
                handle_cancelled(params);
                Ok(None)
            }
            other => {
                Ok(Some(JsonRpcResponse::error(id, JsonRpcError::method_not_found(other))))
            }
        }
    }

    fn handle_initialize(&self, id: RequestId) -> ServerResult<JsonRpcResponse> {
        let result = MCPInitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: MCPServerCapabilities::default(),
            server_info: MCPServerInfo {
                name: SERVER_NAME.to_string(),
                version: VERSION.to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_list_tools(&self, id: RequestId) -> ServerResult<JsonRpcResponse> {
        let result = ListToolsResult { tools: tool_descriptors() };
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    async fn handle_tool_call(
        &mut self,
        id: RequestId,
        params: Option<Value>,
    ) -> ServerResult<JsonRpcResponse> {
        let params: CallToolParams = match serde_json::from_value(params.unwrap_or(Value::Null)) {
            Ok(params) => params,
            Err(err) => {
                return Ok(JsonRpcResponse::error(id, JsonRpcError::invalid_params(err)))
            }
        };

        let arguments = params.arguments.unwrap_or_default();

        let outcome = match params.name.as_str() {
            READ_TOOL => dispatch_read(&mut self.client, &arguments).await,
            CREATE_TOOL => dispatch_create(&mut self.client, &arguments).await,
            name => return Ok(JsonRpcResponse::error(id, JsonRpcError::unknown_tool(name))),
        };

        match outcome {
            Ok(result) => {
                let text = serde_json::to_string_pretty(&result)?;
                let wrapped = serde_json::to_value(CallToolResult::text(text))?;
                Ok(JsonRpcResponse::success(id, wrapped))
            }
            Err(err) => Ok(JsonRpcResponse::error(id, JsonRpcError::internal(err.to_string()))),
        }
    }
}

/// Cancellation is acknowledged in the log only; in-flight work is never
/// aborted because requests are processed one at a time.
fn handle_cancelled(params: Option<Value>) {
    let params: CancelledParams =
        params.and_then(|value| serde_json::from_value(value).ok()).unwrap_or_default();

    let request_id = match params.request_id {
        Some(Value::String(id)) => id,
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    };
    let reason = params.reason.unwrap_or_else(|| "unknown".to_string());

    info!("Request {request_id} was cancelled: {reason}");
}
