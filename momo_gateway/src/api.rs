use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    config::MomoConfig,
    data_objects::{ApiKeyResponse, ApiUserInfo, NewApiUser, PaymentParams, PaymentRequestBody, PaymentStatusResponse},
    error::MomoApiError,
    token::TokenManager,
};

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const REFERENCE_ID_HEADER: &str = "X-Reference-Id";
const TARGET_ENVIRONMENT_HEADER: &str = "X-Target-Environment";

/// Stateless request wrappers around the mobile money provider API.
///
/// One network request per method. Every payment call obtains a bearer token from the
/// [`TokenManager`] first; the sub-account provisioning calls authenticate with the subscription
/// key alone.
#[derive(Clone)]
pub struct MomoApi {
    config: MomoConfig,
    client: Arc<Client>,
    tokens: TokenManager,
}

impl MomoApi {
    pub fn new(config: MomoConfig) -> Result<Self, MomoApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let key = HeaderValue::from_str(config.subscription_key.reveal().as_str())
            .map_err(|e| MomoApiError::Initialization(e.to_string()))?;
        headers.insert(SUBSCRIPTION_KEY_HEADER, key);
        let env = HeaderValue::from_str(&config.target_environment)
            .map_err(|e| MomoApiError::Initialization(e.to_string()))?;
        headers.insert(TARGET_ENVIRONMENT_HEADER, env);
        let client =
            Arc::new(Client::builder().default_headers(headers).build().map_err(|e| MomoApiError::Initialization(e.to_string()))?);
        let tokens = TokenManager::new(config.clone(), client.clone());
        Ok(Self { config, client, tokens })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Ask the payer's handset to approve collecting `params.amount` from them.
    ///
    /// Returns the freshly generated correlation id. It is the only handle to the provider-side
    /// request, so callers must persist it before the first status lookup.
    pub async fn request_to_pay(&self, params: &PaymentParams) -> Result<Uuid, MomoApiError> {
        let reference = Uuid::new_v4();
        let body = PaymentRequestBody::collection(params);
        self.send_accepted("/v1_0/requesttopay", reference, &body).await?;
        debug!("🛰️ request-to-pay of {} {} accepted [{reference}]", params.amount, params.currency);
        Ok(reference)
    }

    /// Pay out `params.amount` to the given msisdn. Same contract as [`Self::request_to_pay`].
    pub async fn transfer(&self, params: &PaymentParams) -> Result<Uuid, MomoApiError> {
        let reference = Uuid::new_v4();
        let body = PaymentRequestBody::disbursement(params);
        self.send_accepted("/v1_0/transfer", reference, &body).await?;
        debug!("🛰️ transfer of {} {} accepted [{reference}]", params.amount, params.currency);
        Ok(reference)
    }

    pub async fn request_to_pay_status(&self, reference: &str) -> Result<PaymentStatusResponse, MomoApiError> {
        self.fetch(&format!("/v1_0/requesttopay/{reference}")).await
    }

    pub async fn transfer_status(&self, reference: &str) -> Result<PaymentStatusResponse, MomoApiError> {
        self.fetch(&format!("/v1_0/transfer/{reference}")).await
    }

    /// Provision a new provider sub-account. The generated reference id becomes the api user id.
    pub async fn create_api_user(&self) -> Result<Uuid, MomoApiError> {
        let api_user = Uuid::new_v4();
        let url = self.url("/v1_0/apiuser");
        let body = NewApiUser { provider_callback_host: self.config.callback_host.clone() };
        let response = self
            .client
            .post(url)
            .header(REFERENCE_ID_HEADER, api_user.to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| MomoApiError::Transport(e.to_string()))?;
        if response.status() != StatusCode::CREATED {
            return Err(error_for(response).await);
        }
        info!("🛰️ Created provider api user {api_user}");
        Ok(api_user)
    }

    /// Issue an API key for an existing sub-account.
    pub async fn create_api_key(&self, api_user: Uuid) -> Result<String, MomoApiError> {
        let url = self.url(&format!("/v1_0/apiuser/{api_user}/apikey"));
        let response = self.client.post(url).send().await.map_err(|e| MomoApiError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_for(response).await);
        }
        let key = response.json::<ApiKeyResponse>().await.map_err(|e| MomoApiError::JsonError(e.to_string()))?;
        info!("🛰️ Issued an API key for api user {api_user}");
        Ok(key.api_key)
    }

    pub async fn fetch_api_user(&self, api_user: Uuid) -> Result<ApiUserInfo, MomoApiError> {
        let url = self.url(&format!("/v1_0/apiuser/{api_user}"));
        let response = self.client.get(url).send().await.map_err(|e| MomoApiError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(error_for(response).await);
        }
        response.json::<ApiUserInfo>().await.map_err(|e| MomoApiError::JsonError(e.to_string()))
    }

    /// POSTs `body` to a write endpoint that responds 202 Accepted with an empty payload.
    async fn send_accepted<B: Serialize>(&self, path: &str, reference: Uuid, body: &B) -> Result<(), MomoApiError> {
        let token = self.tokens.bearer_token().await?;
        let url = self.url(path);
        trace!("🛰️ POST {url} [{reference}]");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(REFERENCE_ID_HEADER, reference.to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| MomoApiError::Transport(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_for(response).await)
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, MomoApiError> {
        let token = self.tokens.bearer_token().await?;
        let url = self.url(path);
        trace!("🛰️ GET {url}");
        let response =
            self.client.get(url).bearer_auth(token).send().await.map_err(|e| MomoApiError::Transport(e.to_string()))?;
        if response.status().is_success() {
            response.json::<T>().await.map_err(|e| MomoApiError::JsonError(e.to_string()))
        } else {
            Err(error_for(response).await)
        }
    }
}

async fn error_for(response: reqwest::Response) -> MomoApiError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    MomoApiError::RequestFailed { status, message }
}
