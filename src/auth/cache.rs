//! Credential cache.
//!
//! Persists the bearer credential obtained from the device-code flow to a
//! single JSON file so restarts reuse it until it expires. A missing or
//! unreadable cache is "no credential", never an error.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// File name of the credential cache, kept from earlier releases so
/// existing caches keep working.
pub const CACHE_FILE_NAME: &str = ".mcp-onenote-cache.json";

/// A cached bearer credential.
///
/// Serialized with camelCase keys to match the historical cache format;
/// records written by older servers (which carried extra provider fields)
/// still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCredential {
    /// The bearer token presented to Microsoft Graph
    pub access_token: String,

    /// Instant after which the token must no longer be used
    pub expires_on: DateTime<Utc>,
}

impl CachedCredential {
    /// Create a credential expiring at the given instant.
    pub fn new(access_token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self { access_token: access_token.into(), expires_on }
    }

    /// A credential is usable iff its expiry is strictly in the future.
    pub fn is_valid(&self) -> bool {
        self.expires_on > Utc::now()
    }
}

/// Reads and writes the single credential record on disk.
#[derive(Debug, Clone)]
pub struct TokenCache {
    /// Cache file location
    path: PathBuf,
}

impl TokenCache {
    /// Create a cache backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached credential, or `None` when the file is missing or
    /// unparseable.
    pub fn load(&self) -> Option<CachedCredential> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => {
                debug!("No cached token found");
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(record) => {
                info!("Token loaded from cache");
                Some(record)
            }
            Err(err) => {
                debug!("Ignoring unparseable token cache: {err}");
                None
            }
        }
    }

    /// Persist the credential, replacing any previous record.
    pub fn save(&self, record: &CachedCredential) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        std::fs::write(&self.path, json)?;

        info!("Token cached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn temp_cache() -> (tempfile::TempDir, TokenCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join(CACHE_FILE_NAME));
        (dir, cache)
    }

    #[test]
    fn test_validity_is_strict_future() {
        let future = CachedCredential::new("t", Utc::now() + Duration::hours(1));
        assert!(future.is_valid());

        let past = CachedCredential::new("t", Utc::now() - Duration::seconds(1));
        assert!(!past.is_valid());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, cache) = temp_cache();
        let record = CachedCredential::new("secret-token", Utc::now() + Duration::hours(1));

        cache.save(&record).unwrap();
        let loaded = cache.load().expect("record should load");

        assert_eq!(loaded.access_token, "secret-token");
        assert_eq!(loaded.expires_on, record.expires_on);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let (_dir, cache) = temp_cache();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_load_garbage_is_none() {
        let (_dir, cache) = temp_cache();
        std::fs::write(cache.path(), "not json at all {").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("nested").join("deeper").join("cache.json"));
        let record = CachedCredential::new("t", Utc::now() + Duration::hours(1));

        cache.save(&record).unwrap();
        assert!(cache.load().is_some());
    }

    #[test]
    fn test_cache_file_uses_camel_case_keys() {
        let record = CachedCredential::new("t", Utc::now() + Duration::hours(1));
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"accessToken\""));
        assert!(json.contains("\"expiresOn\""));
    }

    #[test]
    fn test_loads_legacy_record_with_extra_fields() {
        let (_dir, cache) = temp_cache();
        std::fs::write(
            cache.path(),
            r#"{
                "authority": "https://login.microsoftonline.com/common/",
                "scopes": ["Notes.Read"],
                "accessToken": "legacy-token",
                "expiresOn": "2099-01-02T03:04:05.000Z",
                "tokenType": "Bearer"
            }"#,
        )
        .unwrap();

        let loaded = cache.load().expect("legacy record should load");
        assert_eq!(loaded.access_token, "legacy-token");
        assert!(loaded.is_valid());
    }
}
