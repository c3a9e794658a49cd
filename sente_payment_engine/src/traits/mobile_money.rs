use sente_common::Money;
use thiserror::Error;

use crate::db_types::Currency;

/// One payment or payout instruction handed to the provider.
#[derive(Debug, Clone)]
pub struct PaymentInstruction {
    pub amount: Money,
    pub currency: Currency,
    pub msisdn: String,
    /// Our transaction id, passed through as the provider-side external id.
    pub external_id: String,
    pub note: Option<String>,
}

/// Provider-side state of an in-flight payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Pending,
    Successful,
    Failed { reason: Option<String> },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Token exchange with the provider failed. {0}")]
    Auth(String),
    #[error("The provider rejected the request. Status {status}. {reason}")]
    Rejected { status: u16, reason: String },
    #[error("The provider could not be reached. {0}")]
    Unreachable(String),
}

/// The seam between the payment orchestrator and the mobile money network.
///
/// Write operations return the provider correlation id. It is the only handle to the external
/// operation, so callers must persist it before the first status lookup.
#[allow(async_fn_in_trait)]
pub trait MobileMoneyProvider {
    /// Asks the payer to approve a collection (a deposit into the ledger).
    async fn request_to_pay(&self, instruction: PaymentInstruction) -> Result<String, ProviderError>;

    /// Pays out to the given msisdn (a withdrawal from the ledger).
    async fn transfer(&self, instruction: PaymentInstruction) -> Result<String, ProviderError>;

    async fn collection_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError>;

    async fn disbursement_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError>;
}
