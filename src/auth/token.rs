//! Token provider
//!
//! Signs a service-account JWT and exchanges it for a bearer token at the
//! key's token endpoint, caching the result until shortly before expiry.

use super::types::{CachedToken, ServiceAccountKey, DATASTORE_SCOPE};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Lifetime claimed on the assertion JWT
const ASSERTION_LIFETIME_SECONDS: i64 = 3600;

/// Provides bearer tokens for store requests
pub struct TokenProvider {
    key: ServiceAccountKey,
    cached_token: RwLock<Option<CachedToken>>,
    http_client: Client,
}

impl TokenProvider {
    /// Create a provider for the given key
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            cached_token: RwLock::new(None),
            http_client: Client::new(),
        }
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(key: ServiceAccountKey, http_client: Client) -> Self {
        Self {
            key,
            cached_token: RwLock::new(None),
            http_client,
        }
    }

    /// Create a provider that always returns a fixed token
    ///
    /// The emulator accepts any bearer token, so no exchange is needed.
    pub fn with_static_token(key: ServiceAccountKey, token: impl Into<String>) -> Self {
        Self {
            key,
            cached_token: RwLock::new(Some(CachedToken::new(token.into(), None))),
            http_client: Client::new(),
        }
    }

    /// The key this provider signs with
    pub fn key(&self) -> &ServiceAccountKey {
        &self.key
    }

    /// Get a valid bearer token, exchanging a fresh assertion if the
    /// cached one is expired
    pub async fn token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.exchange().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Drop the cached token, forcing a refresh on the next request
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Sign an assertion and exchange it for an access token
    async fn exchange(&self) -> Result<CachedToken> {
        let assertion = self.sign_assertion()?;

        debug!(token_uri = %self.key.token_uri, "exchanging service account assertion");
        let form = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &assertion),
        ];

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenExchange {
                message: format!("token request failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(token_response.into_cached_token())
    }

    /// Build and sign the RS256 assertion JWT
    fn sign_assertion(&self) -> Result<String> {
        let claims = AssertionClaims::for_key(&self.key);
        let header = Header::new(Algorithm::RS256);

        let encoding_key =
            EncodingKey::from_rsa_pem(self.key.private_key.as_bytes()).map_err(|e| {
                Error::JwtSign {
                    message: format!("invalid private key: {e}"),
                }
            })?;

        encode(&header, &claims, &encoding_key).map_err(|e| Error::JwtSign {
            message: format!("failed to encode JWT: {e}"),
        })
    }
}

/// Claims on the service-account assertion
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

impl AssertionClaims {
    pub(crate) fn for_key(key: &ServiceAccountKey) -> Self {
        let now = Utc::now().timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECONDS,
        }
    }

    #[cfg(test)]
    pub(crate) fn issuer(&self) -> &str {
        &self.iss
    }

    #[cfg(test)]
    pub(crate) fn scope(&self) -> &str {
        &self.scope
    }

    #[cfg(test)]
    pub(crate) fn lifetime(&self) -> i64 {
        self.exp - self.iat
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
