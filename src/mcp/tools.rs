//! Tool descriptors exposed by the server.
//!
//! Two tools cover the whole OneNote surface: `onenote-read` for listing
//! and fetching content, `onenote-create` for creating notebooks,
//! sections, and pages. The operation itself is selected by the `type`
//! argument.

use std::collections::HashMap;

use serde_json::{json, Value};

use super::protocol::{MCPTool, MCPToolInputSchema};

/// Name of the read tool.
pub const READ_TOOL: &str = "onenote-read";

/// Name of the create tool.
pub const CREATE_TOOL: &str = "onenote-create";

fn string_prop(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn enum_prop(description: &str, values: &[&str]) -> Value {
    json!({ "type": "string", "enum": values, "description": description })
}

fn object_schema(properties: Vec<(&str, Value)>, required: &[&str]) -> MCPToolInputSchema {
    let properties: HashMap<String, Value> =
        properties.into_iter().map(|(k, v)| (k.to_string(), v)).collect();

    MCPToolInputSchema {
        schema_type: "object".to_string(),
        properties: Some(properties),
        required: Some(required.iter().map(|s| (*s).to_string()).collect()),
    }
}

fn read_tool() -> MCPTool {
    MCPTool {
        name: READ_TOOL.to_string(),
        description: Some("Read OneNote content (notebooks, sections, pages)".to_string()),
        input_schema: object_schema(
            vec![
                (
                    "type",
                    enum_prop(
                        "Type of read operation",
                        &["list_notebooks", "list_sections", "list_pages", "read_content"],
                    ),
                ),
                ("notebookId", string_prop("Notebook ID (required for list_sections)")),
                ("sectionId", string_prop("Section ID (required for list_pages)")),
                ("pageId", string_prop("Page ID (required for read_content)")),
            ],
            &["type"],
        ),
    }
}

fn create_tool() -> MCPTool {
    MCPTool {
        name: CREATE_TOOL.to_string(),
        description: Some("Create OneNote content (notebooks, sections, pages)".to_string()),
        input_schema: object_schema(
            vec![
                (
                    "type",
                    enum_prop(
                        "Type of create operation",
                        &["create_notebook", "create_section", "create_page"],
                    ),
                ),
                ("displayName", string_prop("Display name for notebook or section")),
                ("notebookId", string_prop("Notebook ID (required for create_section)")),
                ("sectionId", string_prop("Section ID (required for create_page)")),
                ("title", string_prop("Page title (required for create_page)")),
                ("content", string_prop("HTML content for the page")),
            ],
            &["type"],
        ),
    }
}

/// All tools the server advertises, in the order they are listed.
pub fn tool_descriptors() -> Vec<MCPTool> {
    vec![read_tool(), create_tool()]
}
