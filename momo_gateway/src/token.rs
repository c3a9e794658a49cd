use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::*;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{api::SUBSCRIPTION_KEY_HEADER, data_objects::TokenResponse, MomoApiError, MomoConfig};

/// Tokens are treated as expired this long before the provider-reported TTL runs out, so that a
/// token obtained here cannot die mid-request.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Obtains and caches the provider bearer token, refreshing it transparently on expiry.
#[derive(Clone)]
pub struct TokenManager {
    config: MomoConfig,
    client: Arc<Client>,
    cached: Arc<Mutex<Option<AccessToken>>>,
}

impl TokenManager {
    pub fn new(config: MomoConfig, client: Arc<Client>) -> Self {
        Self { config, client, cached: Arc::new(Mutex::new(None)) }
    }

    /// Returns a valid bearer token, performing the basic-auth credential exchange when the cached
    /// one is missing or expired. The cache lock is held across the exchange, so concurrent
    /// callers wait on a single outstanding exchange and all receive the same fresh token.
    pub async fn bearer_token(&self) -> Result<String, MomoApiError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_valid(Utc::now()) {
                return Ok(token.token.clone());
            }
        }
        trace!("🔑️ No valid cached token. Exchanging credentials with the provider");
        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn exchange(&self) -> Result<AccessToken, MomoApiError> {
        let url = format!("{}/v1_0/token", self.config.base_url);
        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.api_user, Some(self.config.api_key.reveal()))
            .header(SUBSCRIPTION_KEY_HEADER, self.config.subscription_key.reveal().as_str())
            .send()
            .await
            .map_err(|e| MomoApiError::Auth(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(MomoApiError::Auth(format!("Token endpoint returned {status}. {message}")));
        }
        let token = response.json::<TokenResponse>().await.map_err(|e| MomoApiError::Auth(e.to_string()))?;
        debug!("🔑️ Obtained a fresh access token, valid for {}s", token.expires_in);
        let ttl = Duration::seconds(token.expires_in as i64 - EXPIRY_MARGIN_SECS);
        Ok(AccessToken { token: token.access_token, expires_at: Utc::now() + ttl })
    }
}
