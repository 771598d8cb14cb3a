//! Microsoft Graph OneNote client.
//!
//! Wraps the `/me/onenote` surface of Graph v1.0: listing notebooks,
//! sections, and pages, reading page HTML, and creating all three.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::auth::{AuthError, TokenProvider};

/// Base URL for Microsoft Graph v1.0.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Result type for Graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Error types for Graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Graph API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// List responses from Graph carry their items under a `value` key.
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    value: Vec<Value>,
}

/// OneNote operations backed by Microsoft Graph.
///
/// The dispatcher is generic over this trait, so tests can substitute a
/// stub for [`OneNoteClient`].
#[async_trait]
pub trait OneNoteApi {
    /// List the signed-in user's notebooks.
    async fn list_notebooks(&mut self) -> GraphResult<Vec<Value>>;

    /// List the sections of a notebook.
    async fn list_sections(&mut self, notebook_id: &str) -> GraphResult<Vec<Value>>;

    /// List the pages of a section.
    async fn list_pages(&mut self, section_id: &str) -> GraphResult<Vec<Value>>;

    /// Fetch a page's HTML content.
    async fn read_page_content(&mut self, page_id: &str) -> GraphResult<String>;

    /// Create a notebook with the given display name.
    async fn create_notebook(&mut self, display_name: &str) -> GraphResult<Value>;

    /// Create a section inside a notebook.
    async fn create_section(&mut self, notebook_id: &str, display_name: &str)
        -> GraphResult<Value>;

    /// Create a page from a complete HTML document.
    async fn create_page(&mut self, section_id: &str, html: &str) -> GraphResult<Value>;
}

/// Graph API client for OneNote.
pub struct OneNoteClient {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL, overridable for tests
    base_url: String,
    /// Token source
    auth: TokenProvider,
}

impl OneNoteClient {
    /// Create a client against the production Graph endpoint.
    pub fn new(auth: TokenProvider) -> Self {
        Self::with_base_url(auth, GRAPH_BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(auth: TokenProvider, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http: reqwest::Client::new(), base_url, auth }
    }

    /// Get the OneNote API URL for a path.
    fn api_url(&self, path: &str) -> String {
        format!("{}/me/onenote/{}", self.base_url, path)
    }

    /// Make an authenticated request, acquiring a token first.
    async fn request(
        &mut self,
        method: reqwest::Method,
        url: &str,
    ) -> GraphResult<reqwest::RequestBuilder> {
        let token = self.auth.get_access_token().await?;
        Ok(self
            .http
            .request(method, url)
            .header("Authorization", format!("Bearer {token}"))
            .header("User-Agent", concat!("onenote-mcp/", env!("CARGO_PKG_VERSION"))))
    }

    /// Parse an error response from the Graph API.
    async fn parse_error(&self, response: reqwest::Response) -> GraphError {
        let status = response.status().as_u16();
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));
        error!("Graph API error: {message}");
        GraphError::Api { status, message }
    }

    async fn get_list(&mut self, url: &str) -> GraphResult<Vec<Value>> {
        let response = self.request(reqwest::Method::GET, url).await?.send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let envelope: ListEnvelope = response.json().await?;
        Ok(envelope.value)
    }

    async fn post_json(&mut self, url: &str, body: &Value) -> GraphResult<Value> {
        let response = self.request(reqwest::Method::POST, url).await?.json(body).send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn post_html(&mut self, url: &str, html: &str) -> GraphResult<Value> {
        let response = self
            .request(reqwest::Method::POST, url)
            .await?
            .header("Content-Type", "text/html")
            .body(html.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl OneNoteApi for OneNoteClient {
    async fn list_notebooks(&mut self) -> GraphResult<Vec<Value>> {
        info!("Reading notebooks");
        let url = self.api_url("notebooks");
        self.get_list(&url).await
    }

    async fn list_sections(&mut self, notebook_id: &str) -> GraphResult<Vec<Value>> {
        info!("Reading sections for notebook: {notebook_id}");
        let url = self.api_url(&format!("notebooks/{notebook_id}/sections"));
        self.get_list(&url).await
    }

    async fn list_pages(&mut self, section_id: &str) -> GraphResult<Vec<Value>> {
        info!("Reading pages for section: {section_id}");
        let url = self.api_url(&format!("sections/{section_id}/pages"));
        self.get_list(&url).await
    }

    async fn read_page_content(&mut self, page_id: &str) -> GraphResult<String> {
        info!("Reading content for page: {page_id}");
        let url = self.api_url(&format!("pages/{page_id}/content"));

        let response = self.request(reqwest::Method::GET, &url).await?.send().await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        Ok(response.text().await?)
    }

    async fn create_notebook(&mut self, display_name: &str) -> GraphResult<Value> {
        info!("Creating notebook: {display_name}");
        let url = self.api_url("notebooks");
        self.post_json(&url, &json!({ "displayName": display_name })).await
    }

    async fn create_section(
        &mut self,
        notebook_id: &str,
        display_name: &str,
    ) -> GraphResult<Value> {
        info!("Creating section: {display_name} in notebook: {notebook_id}");
        let url = self.api_url(&format!("notebooks/{notebook_id}/sections"));
        self.post_json(&url, &json!({ "displayName": display_name })).await
    }

    async fn create_page(&mut self, section_id: &str, html: &str) -> GraphResult<Value> {
        let url = self.api_url(&format!("sections/{section_id}/pages"));

        match self.post_html(&url, html).await {
            Ok(page) => Ok(page),
            Err(err) => {
                error!("Page creation error: {err}");
                Err(err)
            }
        }
    }
}

/// Wrap a content fragment in the HTML document envelope OneNote expects.
pub fn page_html(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <title>{title}</title>\n</head>\n<body>\n  {content}\n</body>\n</html>"
    )
}
