//! Authentication against the Microsoft identity platform.
//!
//! Splits into two halves: the on-disk credential cache and the token
//! provider that runs the interactive device-code flow when the cache
//! cannot satisfy a request.

mod cache;
mod provider;

pub use cache::{CachedCredential, TokenCache, CACHE_FILE_NAME};
pub use provider::{
    AuthError, AuthResult, DeviceCodePrompt, TokenProvider, AUTHORITY, SCOPES,
};
