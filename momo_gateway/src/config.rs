use log::*;
use sente_common::Secret;

use crate::MomoApiError;

pub const DEFAULT_MOMO_BASE_URL: &str = "https://sandbox.momodeveloper.mtn.com";
const DEFAULT_TARGET_ENVIRONMENT: &str = "sandbox";

/// Credentials and endpoints for the mobile money provider.
///
/// The subscription key identifies the merchant product subscription; the api user / api key pair
/// is the sub-account used for the basic-auth token exchange. All three must be present for the
/// gateway to function, which is why [`MomoConfig::try_from_env`] refuses to start without them.
#[derive(Debug, Clone, Default)]
pub struct MomoConfig {
    pub base_url: String,
    pub subscription_key: Secret<String>,
    pub api_user: String,
    pub api_key: Secret<String>,
    pub target_environment: String,
    pub callback_host: String,
}

impl MomoConfig {
    pub fn from_env_or_default() -> Self {
        let base_url = std::env::var("SPG_MOMO_BASE_URL").unwrap_or_else(|_| {
            warn!("SPG_MOMO_BASE_URL not set, using the provider sandbox");
            DEFAULT_MOMO_BASE_URL.to_string()
        });
        let subscription_key = Secret::new(std::env::var("SPG_MOMO_SUBSCRIPTION_KEY").unwrap_or_else(|_| {
            warn!("SPG_MOMO_SUBSCRIPTION_KEY not set, using (probably useless) default");
            String::default()
        }));
        let api_user = std::env::var("SPG_MOMO_API_USER").unwrap_or_else(|_| {
            warn!("SPG_MOMO_API_USER not set, using (probably useless) default");
            String::default()
        });
        let api_key = Secret::new(std::env::var("SPG_MOMO_API_KEY").unwrap_or_else(|_| {
            warn!("SPG_MOMO_API_KEY not set, using (probably useless) default");
            String::default()
        }));
        let target_environment = std::env::var("SPG_MOMO_TARGET_ENVIRONMENT").unwrap_or_else(|_| {
            info!("SPG_MOMO_TARGET_ENVIRONMENT not set, using {DEFAULT_TARGET_ENVIRONMENT}");
            DEFAULT_TARGET_ENVIRONMENT.to_string()
        });
        let callback_host = std::env::var("SPG_MOMO_CALLBACK_HOST").unwrap_or_else(|_| "localhost".to_string());
        Self { base_url, subscription_key, api_user, api_key, target_environment, callback_host }
    }

    /// Refuses a config with missing credentials. The server calls this at startup so a
    /// misconfigured deployment dies immediately instead of failing on its first payment.
    pub fn validate(&self) -> Result<(), MomoApiError> {
        if self.subscription_key.reveal().is_empty() {
            return Err(MomoApiError::Initialization("SPG_MOMO_SUBSCRIPTION_KEY is not set".to_string()));
        }
        if self.api_user.is_empty() {
            return Err(MomoApiError::Initialization("SPG_MOMO_API_USER is not set".to_string()));
        }
        if self.api_key.reveal().is_empty() {
            return Err(MomoApiError::Initialization("SPG_MOMO_API_KEY is not set".to_string()));
        }
        Ok(())
    }
}
