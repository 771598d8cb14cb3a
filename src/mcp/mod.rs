//! MCP (Model Context Protocol) server.
//!
//! This module implements an MCP server speaking line-delimited JSON-RPC
//! 2.0 over stdio. It exposes OneNote read and create operations as MCP
//! tools, so any MCP-capable client can browse and author notebooks.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   MCP Client                      │
//! └──────────────────────┬───────────────────────────┘
//!                 stdin  │  stdout (one JSON line each way)
//! ┌──────────────────────▼───────────────────────────┐
//! │             OneNoteMcpServer                      │
//! │  • Parses JSON-RPC envelopes                     │
//! │  • Answers initialize / tools/list itself        │
//! │  • Hands tools/call to the dispatcher            │
//! └──────────────────────┬───────────────────────────┘
//!                        ▼
//!              dispatch_read / dispatch_create
//!                        ▼
//!                OneNoteApi (Microsoft Graph)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use onenote_mcp::mcp::OneNoteMcpServer;
//!
//! let client = OneNoteClient::new(provider);
//! let mut server = OneNoteMcpServer::new(client);
//!
//! // Run over stdio until EOF or Ctrl-C
//! server.serve().await?;
//! ```

mod dispatch;
mod protocol;
mod server;
mod tools;

pub use dispatch::{dispatch_create, dispatch_read, DispatchError, DispatchResult};
pub use protocol::{
    CallToolParams, CallToolResult, CancelledParams, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, MCPInitializeResult, MCPServerCapabilities, MCPServerInfo,
    MCPTool, MCPToolInputSchema, RequestId, ToolContent,
};
pub use server::{OneNoteMcpServer, ServerError, ServerResult};
pub use tools::{tool_descriptors, CREATE_TOOL, READ_TOOL};
