use sente_common::Money;
use thiserror::Error;

use crate::{
    db_types::Currency,
    traits::{LedgerError, ProviderError},
};

#[derive(Debug, Clone, Error)]
pub enum PaymentFlowError {
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("Insufficient {currency} balance: available {available}, requested {requested}")]
    InsufficientFunds { currency: Currency, available: Money, requested: Money },
    #[error("Token exchange with the mobile money provider failed. {0}")]
    AuthError(String),
    #[error("The mobile money provider rejected the request. Status {status}. {reason}")]
    ProviderRejected { status: u16, reason: String },
    #[error("The mobile money provider is unreachable. {0}")]
    ProviderUnavailable(String),
    #[error("Status polling exhausted its retry budget before the provider reached a terminal state")]
    OrchestrationTimeout,
    #[error("No user is registered with phone number {0}")]
    RecipientNotFound(String),
    #[error("No wallet exists for user {0}")]
    WalletNotFound(i64),
    #[error("Transaction {0} does not exist")]
    TransactionNotFound(i64),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerError> for PaymentFlowError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds { currency, available, requested } => {
                Self::InsufficientFunds { currency, available, requested }
            },
            LedgerError::UserNotFound(phone) => Self::RecipientNotFound(phone),
            LedgerError::WalletNotFound(user_id) => Self::WalletNotFound(user_id),
            LedgerError::TransactionNotFound(id) => Self::TransactionNotFound(id),
            LedgerError::PhoneAlreadyRegistered(phone) => {
                Self::ValidationError(format!("Phone number {phone} is already registered"))
            },
            LedgerError::DatabaseError(msg) => Self::DatabaseError(msg),
            LedgerError::IllegalStatusTransition(id) => {
                Self::DatabaseError(format!("Transaction {id} is not in a state that permits this transition"))
            },
        }
    }
}

impl From<ProviderError> for PaymentFlowError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Auth(msg) => Self::AuthError(msg),
            ProviderError::Rejected { status, reason } => Self::ProviderRejected { status, reason },
            ProviderError::Unreachable(msg) => Self::ProviderUnavailable(msg),
        }
    }
}
