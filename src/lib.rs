//! # OneNote MCP Server
//!
//! A Model Context Protocol server exposing Microsoft OneNote over stdio.
//!
//! The server speaks line-delimited JSON-RPC 2.0 on stdin/stdout and
//! proxies tool calls to Microsoft Graph, authenticating with the OAuth
//! 2.0 device code flow on first use and caching the credential locally.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install onenote-mcp
//!
//! # Register your Azure app's client id
//! export AZURE_CLIENT_ID=00000000-0000-0000-0000-000000000000
//!
//! # Serve MCP over stdio
//! onenote-mcp
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod auth;
pub mod config;
pub mod graph;
pub mod mcp;

// Re-export commonly used types
pub use auth::{AuthError, CachedCredential, TokenCache, TokenProvider};
pub use config::Config;
pub use graph::{GraphError, OneNoteApi, OneNoteClient};
pub use mcp::OneNoteMcpServer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name reported during initialization
pub const SERVER_NAME: &str = "OneNote MCP Server";

/// MCP protocol revision this server implements
pub const PROTOCOL_VERSION: &str = "2024-11-05";
