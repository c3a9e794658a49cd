use sente_common::Money;
use thiserror::Error;

use crate::db_types::{Currency, NewTransaction, Transaction, UserProfile, Wallet};

/// How a mobile money transaction leaves the in-flight state.
#[derive(Debug, Clone)]
pub enum SettlementOutcome {
    /// The provider confirmed the payment. The ledger delta is applied together with the
    /// terminal write.
    Confirmed { provider_status: String },
    /// The provider rejected or failed the payment. No ledger mutation.
    Rejected { provider_status: Option<String>, reason: Option<String> },
    /// Polling exhausted its retry budget without reaching a terminal provider status.
    TimedOut,
}

/// Storage behaviour a backend must provide to support the payment engine.
///
/// Multi-step operations (`create_account`, `settle_transaction`, `transfer_between`,
/// `swap_within`) are atomic: either every write in them lands, or none does.
#[allow(async_fn_in_trait)]
pub trait LedgerDatabase {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Creates a user together with a zeroed wallet.
    async fn create_account(
        &self,
        phone_number: &str,
        name: &str,
        language: &str,
    ) -> Result<(UserProfile, Wallet), LedgerError>;

    async fn fetch_user_by_phone(&self, phone_number: &str) -> Result<Option<UserProfile>, LedgerError>;

    async fn fetch_wallet(&self, user_id: i64) -> Result<Option<Wallet>, LedgerError>;

    async fn fetch_transaction(&self, id: i64) -> Result<Option<Transaction>, LedgerError>;

    /// The most recent transactions for a user, newest first.
    async fn fetch_history(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>, LedgerError>;

    /// Persists a new transaction in `Pending` state.
    async fn insert_pending_transaction(&self, transaction: NewTransaction) -> Result<Transaction, LedgerError>;

    /// Records the provider reference id and moves the row `Pending → Submitted`. Fails when the
    /// row is no longer `Pending`.
    async fn mark_submitted(&self, id: i64, reference_id: &str) -> Result<Transaction, LedgerError>;

    /// Moves an in-flight transaction to its terminal status and, for a confirmed outcome,
    /// applies the wallet delta in the same storage transaction.
    ///
    /// The update is guarded on the row still being `Pending` or `Submitted`: when a concurrent
    /// or duplicate settlement already won, `None` is returned and nothing is mutated. This is
    /// what makes the balance mutation at-most-once.
    async fn settle_transaction(&self, id: i64, outcome: SettlementOutcome)
        -> Result<Option<Transaction>, LedgerError>;

    /// All transactions sitting in `Submitted` with a recorded reference id, for the startup
    /// recovery sweep.
    async fn fetch_submitted_transactions(&self) -> Result<Vec<Transaction>, LedgerError>;

    /// Moves `amount` between two wallets and writes the Send/Receive transaction pair.
    /// Returns the sender-side transaction.
    async fn transfer_between(
        &self,
        sender_id: i64,
        recipient_phone: &str,
        amount: Money,
        currency: Currency,
        note: Option<String>,
    ) -> Result<Transaction, LedgerError>;

    /// Exchanges `amount` of `from` for `converted` of `to` within one wallet.
    async fn swap_within(
        &self,
        user_id: i64,
        from: Currency,
        to: Currency,
        amount: Money,
        converted: Money,
        note: Option<String>,
    ) -> Result<Transaction, LedgerError>;
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("No wallet exists for user {0}")]
    WalletNotFound(i64),
    #[error("No user is registered with phone number {0}")]
    UserNotFound(String),
    #[error("Transaction {0} does not exist")]
    TransactionNotFound(i64),
    #[error("Phone number {0} is already registered")]
    PhoneAlreadyRegistered(String),
    #[error("Insufficient {currency} balance: available {available}, requested {requested}")]
    InsufficientFunds { currency: Currency, available: Money, requested: Money },
    #[error("Transaction {0} is not in a state that permits this transition")]
    IllegalStatusTransition(i64),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
