//! OneNote MCP Server - Microsoft OneNote over the Model Context Protocol.
//!
//! Speaks line-delimited JSON-RPC 2.0 on stdin/stdout and proxies tool
//! calls to Microsoft Graph, authenticating with the device-code flow on
//! first use.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use onenote_mcp::auth::{TokenCache, TokenProvider};
use onenote_mcp::config::Config;
use onenote_mcp::graph::OneNoteClient;
use onenote_mcp::mcp::{tool_descriptors, OneNoteMcpServer};

/// Microsoft OneNote over the Model Context Protocol
#[derive(Parser)]
#[command(name = "onenote-mcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Azure application (client) id
    #[arg(long, env = "AZURE_CLIENT_ID", global = true)]
    client_id: Option<String>,

    /// Credential cache file
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default)
    Serve,

    /// Sign in via the device-code flow and cache the credential
    Login {
        /// Re-authenticate even if a valid credential is cached
        #[arg(short, long)]
        force: bool,
    },

    /// Print the tool descriptors as JSON
    Tools,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for protocol frames
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load()?;

    match cli.command {
        None | Some(Commands::Serve) => cmd_serve(&config, cli.client_id, cli.cache_file),
        Some(Commands::Login { force }) => {
            cmd_login(&config, cli.client_id, cli.cache_file, force)
        }
        Some(Commands::Tools) => cmd_tools(),
    }
}

/// Run the stdio server.
fn cmd_serve(
    config: &Config,
    client_id: Option<String>,
    cache_file: Option<PathBuf>,
) -> Result<()> {
    info!("Starting OneNote MCP Server");

    let client_id = config.resolve_client_id(client_id);
    if client_id.is_none() {
        warn!("AZURE_CLIENT_ID not set. Please set it before using the server.");
    }

    let cache = TokenCache::new(config.resolve_cache_file(cache_file));
    let provider = TokenProvider::new(client_id, cache, config.auth.timeout_secs);
    let client = OneNoteClient::with_base_url(provider, config.graph.base_url.clone());
    let mut server = OneNoteMcpServer::new(client);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server.serve())?;

    Ok(())
}

/// Run the token path eagerly without serving.
fn cmd_login(
    config: &Config,
    client_id: Option<String>,
    cache_file: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let client_id = config.resolve_client_id(client_id);
    let cache = TokenCache::new(config.resolve_cache_file(cache_file));
    let mut provider = TokenProvider::new(client_id, cache, config.auth.timeout_secs);

    if !force {
        if let Some(record) = provider.cached() {
            if record.is_valid() {
                println!("Already signed in; credential valid until {}", record.expires_on);
                return Ok(());
            }
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    let record = rt.block_on(provider.authenticate())?;
    println!("Signed in; credential valid until {}", record.expires_on);

    Ok(())
}

/// Print the tool descriptors.
fn cmd_tools() -> Result<()> {
    let tools = tool_descriptors();
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}
