//! Service-account credential types

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::path::Path;

/// OAuth2 scope granting access to the document database
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Contents of a service-account key file (`serviceAccountKey.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Project the key belongs to
    pub project_id: String,
    /// RSA private key, PEM encoded
    pub private_key: String,
    /// Service account email, used as the JWT issuer
    pub client_email: String,
    /// Token exchange endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Load a key from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_json(&content)
    }

    /// Parse a key from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(content)?;
        if key.project_id.is_empty() {
            return Err(Error::missing_field("project_id"));
        }
        if key.client_email.is_empty() {
            return Err(Error::missing_field("client_email"));
        }
        if key.private_key.is_empty() {
            return Err(Error::missing_field("private_key"));
        }
        Ok(key)
    }
}

/// A bearer token with its expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The token value
    pub token: String,
    /// When the token expires, if known
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a token with an optional expiry
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token expiring after the given number of seconds
    pub fn expires_in(token: String, seconds: i64) -> Self {
        Self {
            token,
            expires_at: Some(Utc::now() + Duration::seconds(seconds)),
        }
    }

    /// Whether the token is expired or about to expire
    ///
    /// A 60 second slack avoids using a token that dies mid-request.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() + Duration::seconds(60) >= at,
            None => false,
        }
    }
}
