//! Tool argument validation and routing.
//!
//! Resolves the `type` argument of the two OneNote tools to a Graph
//! operation. Validation happens before any network call, so a request
//! missing a required field never leaves the process.

use std::collections::HashMap;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::graph::{page_html, GraphError, OneNoteApi};

/// HTML fragment used when `create_page` is called without content.
const DEFAULT_PAGE_CONTENT: &str = "<p>New page</p>";

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised while resolving and executing a tool call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A required argument is missing or empty.
    #[error("{0}")]
    Validation(String),

    #[error("Unknown read type: {0}")]
    UnknownReadType(String),

    #[error("Unknown create type: {0}")]
    UnknownCreateType(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A string argument; empty strings count as absent.
fn arg<'a>(args: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn required<'a>(
    args: &'a HashMap<String, Value>,
    key: &str,
    message: &str,
) -> DispatchResult<&'a str> {
    arg(args, key).ok_or_else(|| DispatchError::Validation(message.to_string()))
}

/// Execute an `onenote-read` call.
pub async fn dispatch_read<C: OneNoteApi>(
    client: &mut C,
    args: &HashMap<String, Value>,
) -> DispatchResult<Value> {
    let read_type = required(args, "type", "type is required")?;

    match read_type {
        "list_notebooks" => Ok(Value::Array(client.list_notebooks().await?)),
        "list_sections" => {
            let notebook_id = required(args, "notebookId", "notebookId is required")?;
            Ok(Value::Array(client.list_sections(notebook_id).await?))
        }
        "list_pages" => {
            let section_id = required(args, "sectionId", "sectionId is required")?;
            Ok(Value::Array(client.list_pages(section_id).await?))
        }
        "read_content" => {
            let page_id = required(args, "pageId", "pageId is required")?;
            let content = client.read_page_content(page_id).await?;
            Ok(json!({ "pageId": page_id, "content": content }))
        }
        other => Err(DispatchError::UnknownReadType(other.to_string())),
    }
}

/// Execute an `onenote-create` call.
pub async fn dispatch_create<C: OneNoteApi>(
    client: &mut C,
    args: &HashMap<String, Value>,
) -> DispatchResult<Value> {
    let create_type = required(args, "type", "type is required")?;

    match create_type {
        "create_notebook" => {
            let display_name = required(args, "displayName", "displayName is required")?;
            Ok(client.create_notebook(display_name).await?)
        }
        "create_section" => {
            let (notebook_id, display_name) =
                match (arg(args, "notebookId"), arg(args, "displayName")) {
                    (Some(notebook_id), Some(display_name)) => (notebook_id, display_name),
                    _ => {
                        return Err(DispatchError::Validation(
                            "notebookId and displayName are required".to_string(),
                        ))
                    }
                };
            Ok(client.create_section(notebook_id, display_name).await?)
        }
        "create_page" => {
            let (section_id, title) = match (arg(args, "sectionId"), arg(args, "title")) {
                (Some(section_id), Some(title)) => (section_id, title),
                _ => {
                    return Err(DispatchError::Validation(
                        "sectionId and title are required".to_string(),
                    ))
                }
            };
            let content = arg(args, "content").unwrap_or(DEFAULT_PAGE_CONTENT);

            info!("Creating page: {title} in section: {section_id}");
            let html = page_html(title, content);
            Ok(client.create_page(section_id, &html).await?)
        }
        other => Err(DispatchError::UnknownCreateType(other.to_string())),
    }
}
