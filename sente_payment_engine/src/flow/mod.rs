//! # Sente payment engine public API
//!
//! An API instance is created by supplying the backends it drives. [`PaymentFlowApi`] needs a
//! ledger database and a mobile money provider; [`WalletApi`] needs only the database.
//!
//! ```rust,ignore
//! use sente_payment_engine::{poller::{PollConfig, PollQueue}, PaymentFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = PaymentFlowApi::new(db, provider, PollQueue::new(), PollConfig::default());
//! let receipt = api.initiate_deposit(user_id, request).await?;
//! ```
mod errors;
mod payment_flow_api;
mod wallet_api;

pub mod objects;

pub use errors::PaymentFlowError;
pub use payment_flow_api::PaymentFlowApi;
pub use wallet_api::WalletApi;

use sente_common::Money;

/// Parses a wire amount and enforces that it is strictly positive.
pub(crate) fn parse_amount(raw: &str) -> Result<Money, PaymentFlowError> {
    let amount = raw.parse::<Money>().map_err(|e| PaymentFlowError::ValidationError(e.to_string()))?;
    if !amount.is_positive() {
        return Err(PaymentFlowError::ValidationError("Amount must be positive".to_string()));
    }
    Ok(amount)
}
