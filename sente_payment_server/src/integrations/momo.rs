use momo_gateway::{MomoApi, MomoApiError, PaymentParams, PaymentStatus, PaymentStatusResponse};
use sente_payment_engine::traits::{
    MobileMoneyProvider,
    PaymentInstruction,
    ProviderError,
    ProviderStatus,
};

/// Binds the engine's provider seam to the MoMo gateway client.
#[derive(Clone)]
pub struct MomoProvider {
    api: MomoApi,
}

impl MomoProvider {
    pub fn new(api: MomoApi) -> Self {
        Self { api }
    }
}

impl MobileMoneyProvider for MomoProvider {
    async fn request_to_pay(&self, instruction: PaymentInstruction) -> Result<String, ProviderError> {
        self.api.request_to_pay(&params(instruction)).await.map(|r| r.to_string()).map_err(provider_error)
    }

    async fn transfer(&self, instruction: PaymentInstruction) -> Result<String, ProviderError> {
        self.api.transfer(&params(instruction)).await.map(|r| r.to_string()).map_err(provider_error)
    }

    async fn collection_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError> {
        self.api.request_to_pay_status(reference_id).await.map(provider_status).map_err(provider_error)
    }

    async fn disbursement_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError> {
        self.api.transfer_status(reference_id).await.map(provider_status).map_err(provider_error)
    }
}

fn params(instruction: PaymentInstruction) -> PaymentParams {
    PaymentParams {
        amount: instruction.amount.to_string(),
        currency: instruction.currency.to_string(),
        external_id: instruction.external_id,
        msisdn: instruction.msisdn,
        message: instruction.note,
    }
}

fn provider_status(response: PaymentStatusResponse) -> ProviderStatus {
    match response.status {
        PaymentStatus::Pending => ProviderStatus::Pending,
        PaymentStatus::Successful => ProviderStatus::Successful,
        PaymentStatus::Failed => ProviderStatus::Failed { reason: response.reason.map(|r| r.code) },
    }
}

fn provider_error(e: MomoApiError) -> ProviderError {
    match e {
        MomoApiError::Auth(msg) => ProviderError::Auth(msg),
        MomoApiError::RequestFailed { status, message } => ProviderError::Rejected { status, reason: message },
        MomoApiError::Transport(msg) | MomoApiError::JsonError(msg) | MomoApiError::Initialization(msg) => {
            ProviderError::Unreachable(msg)
        },
    }
}
