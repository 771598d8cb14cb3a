//! Token acquisition via the OAuth 2.0 device authorization grant.
//!
//! The [`TokenProvider`] holds the client id, the on-disk cache, and the
//! most recently acquired credential. Callers only ever ask it for a bearer
//! token; the interactive device-code flow runs when nothing valid is
//! cached.

use std::time::Duration;

use chrono::{DateTime, Utc};
use oauth2::basic::BasicClient;
use oauth2::devicecode::{DeviceCodeErrorResponseType, StandardDeviceAuthorizationResponse};
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, ClientId, DeviceAuthorizationUrl, RequestTokenError, Scope, TokenResponse,
    TokenUrl,
};
use thiserror::Error;
use tracing::{error, info};

use super::cache::{CachedCredential, TokenCache};

/// Microsoft identity authority used for all token endpoints.
pub const AUTHORITY: &str = "https://login.microsoftonline.com/common";

/// Delegated Graph scopes requested during authentication.
pub const SCOPES: [&str; 4] = ["Notes.Read", "Notes.Create", "Notes.ReadWrite", "User.Read"];

/// Tokens are considered expired this many seconds before the issuer says so,
/// so a request never goes out with a token about to lapse mid-flight.
const EXPIRY_MARGIN_SECS: u64 = 300;

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur while acquiring a token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No client id was configured.
    #[error("AZURE_CLIENT_ID is not set. Please set it before using the server.")]
    MissingClientId,

    /// An endpoint URL could not be constructed.
    #[error("Invalid authority URL: {0}")]
    Endpoint(String),

    /// The device authorization grant failed.
    #[error("Device authorization failed: {0}")]
    DeviceFlow(String),

    /// The user did not complete sign-in before the polling window closed.
    #[error("Device code flow timed out after {0} seconds")]
    Timeout(u64),

    /// The credential cache could not be written.
    #[error("Failed to persist credential cache: {0}")]
    Cache(#[from] std::io::Error),
}

/// Callback invoked with the verification URI and user code once the
/// device-code flow has started.
pub type DeviceCodePrompt = Box<dyn Fn(&str, &str) + Send + Sync>;

fn default_prompt() -> DeviceCodePrompt {
    Box::new(|uri, code| {
        info!("Please navigate to: {uri}");
        info!("Enter code: {code}");
    })
}

/// Provides bearer tokens, refreshing via the device-code flow on demand.
pub struct TokenProvider {
    client_id: Option<String>,
    cache: TokenCache,
    current: Option<CachedCredential>,
    prompt: DeviceCodePrompt,
    timeout_secs: u64,
}

impl TokenProvider {
    /// Create a provider, loading any previously cached credential.
    pub fn new(client_id: Option<String>, cache: TokenCache, timeout_secs: u64) -> Self {
        let current = cache.load();
        Self { client_id, cache, current, prompt: default_prompt(), timeout_secs }
    }

    /// Replace how the verification URI and user code are shown.
    #[must_use]
    pub fn with_prompt(mut self, prompt: DeviceCodePrompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// The credential currently held in memory, if any.
    pub fn cached(&self) -> Option<&CachedCredential> {
        self.current.as_ref()
    }

    /// Return a valid bearer token, authenticating interactively if the
    /// cached credential is missing or expired.
    pub async fn get_access_token(&mut self) -> AuthResult<String> {
        if let Some(record) = &self.current {
            if record.is_valid() {
                info!("Using cached token");
                return Ok(record.access_token.clone());
            }
        }

        info!("Acquiring new token via Device Code flow");
        let record = self.authenticate().await?;
        Ok(record.access_token)
    }

    /// Run the device-code flow unconditionally and persist the result.
    pub async fn authenticate(&mut self) -> AuthResult<CachedCredential> {
        match self.acquire_credential().await {
            Ok(record) => {
                info!("Authentication successful");
                self.current = Some(record.clone());
                Ok(record)
            }
            Err(err) => {
                error!("Authentication failed: {err}");
                Err(err)
            }
        }
    }

    async fn acquire_credential(&self) -> AuthResult<CachedCredential> {
        let client_id = self.client_id.as_deref().ok_or(AuthError::MissingClientId)?;
        let client = build_client(client_id)?;

        let details: StandardDeviceAuthorizationResponse = client
            .exchange_device_code()
            .map_err(|e| AuthError::DeviceFlow(e.to_string()))?
            .add_scopes(SCOPES.iter().map(|s| Scope::new((*s).to_string())))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::DeviceFlow(e.to_string()))?;

        (self.prompt)(details.verification_uri().as_str(), details.user_code().secret());

        let token = client
            .exchange_device_access_token(&details)
            .request_async(
                async_http_client,
                tokio::time::sleep,
                Some(Duration::from_secs(self.timeout_secs)),
            )
            .await
            .map_err(|e| match &e {
                RequestTokenError::ServerResponse(resp)
                    if matches!(resp.error(), DeviceCodeErrorResponseType::ExpiredToken) =>
                {
                    AuthError::Timeout(self.timeout_secs)
                }
                _ => AuthError::DeviceFlow(e.to_string()),
            })?;

        let record = CachedCredential::new(
            token.access_token().secret().clone(),
            expires_on(token.expires_in()),
        );
        self.cache.save(&record)?;
        Ok(record)
    }
}

/// Microsoft's v2.0 endpoints reject client credentials in the Authorization
/// header for public clients, hence [`AuthType::RequestBody`].
fn build_client(client_id: &str) -> AuthResult<BasicClient> {
    let auth_url = AuthUrl::new(format!("{AUTHORITY}/oauth2/v2.0/authorize"))
        .map_err(|e| AuthError::Endpoint(e.to_string()))?;
    let token_url = TokenUrl::new(format!("{AUTHORITY}/oauth2/v2.0/token"))
        .map_err(|e| AuthError::Endpoint(e.to_string()))?;
    let device_url = DeviceAuthorizationUrl::new(format!("{AUTHORITY}/oauth2/v2.0/devicecode"))
        .map_err(|e| AuthError::Endpoint(e.to_string()))?;

    Ok(BasicClient::new(ClientId::new(client_id.to_string()), None, auth_url, Some(token_url))
        .set_device_authorization_url(device_url)
        .set_auth_type(AuthType::RequestBody))
}

fn expires_on(expires_in: Option<Duration>) -> DateTime<Utc> {
    let secs = expires_in.map_or(0, |d| d.as_secs());
    Utc::now() + chrono::Duration::seconds(secs.saturating_sub(EXPIRY_MARGIN_SECS) as i64)
}
