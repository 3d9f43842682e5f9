use parking_lot::Mutex;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{Credentials, Environment};
use crate::error::{MarketError, Result};

pub const API_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

// Refresh this long before the server-side expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_lifetime")]
    expires_in: u64,
}

fn default_lifetime() -> u64 {
    7200
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Client-credentials OAuth token source with an in-process cache.
pub struct TokenProvider {
    http: Client,
    url: String,
    credentials: Credentials,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(http: Client, environment: Environment, credentials: Credentials) -> Self {
        Self::with_url(http, environment.oauth_url(), credentials)
    }

    pub fn with_url(http: Client, url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http,
            url: url.into(),
            credentials,
            cache: Mutex::new(None),
        }
    }

    pub fn cached(&self) -> Option<String> {
        let now = Instant::now();
        self.cache
            .lock()
            .as_ref()
            .filter(|t| t.is_fresh(now))
            .map(|t| t.value.clone())
    }

    pub async fn token(&self) -> Result<String> {
        if let Some(token) = self.cached() {
            debug!("reusing cached OAuth token");
            return Ok(token);
        }

        let (client_id, client_secret) = self.credentials.oauth_pair()?;
        info!(url = %self.url, "requesting OAuth token");

        let response = self
            .http
            .post(&self.url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", API_SCOPE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "OAuth token request rejected");
            return Err(MarketError::Token(format!("HTTP {}: {}", status.as_u16(), body)).into());
        }

        let parsed: TokenResponse = response.json().await?;
        self.store(parsed.access_token.clone(), Duration::from_secs(parsed.expires_in));
        info!(expires_in = parsed.expires_in, "OAuth token received");
        Ok(parsed.access_token)
    }

    fn store(&self, value: String, lifetime: Duration) {
        *self.cache.lock() = Some(CachedToken {
            value,
            expires_at: Instant::now() + lifetime,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TokenProvider {
        TokenProvider::with_url(Client::new(), "http://127.0.0.1:9/token", Credentials::default())
    }

    #[test]
    fn empty_cache_has_nothing() {
        assert!(provider().cached().is_none());
    }

    #[test]
    fn stored_token_is_reused_until_near_expiry() {
        let p = provider();
        p.store("abc".into(), Duration::from_secs(3600));
        assert_eq!(p.cached().as_deref(), Some("abc"));

        p.store("short".into(), Duration::from_secs(30));
        assert!(p.cached().is_none());
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let err = provider().token().await.unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn token_response_defaults_lifetime() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token":"v^1.1#abc","token_type":"Application Access Token"}"#)
                .unwrap();
        assert_eq!(parsed.expires_in, 7200);
        assert_eq!(parsed.access_token, "v^1.1#abc");
    }
}
