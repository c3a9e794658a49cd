//! `SqliteDatabase` is the concrete SQLite backend of the payment engine.
//!
//! It implements [`LedgerDatabase`] on top of the low-level functions in the [`db`](super::db)
//! module, composing them into atomic units with `pool.begin()` where an operation touches more
//! than one row.
use std::fmt::Debug;

use log::*;
use sente_common::Money;
use sqlx::{SqliteConnection, SqlitePool};

use super::db::{new_pool, transactions, users, wallets};
use crate::{
    db_types::{Currency, NewTransaction, Transaction, TransactionKind, TransactionStatus, UserProfile, Wallet},
    traits::{LedgerDatabase, LedgerError, SettlementOutcome},
};

/// Reason recorded when a confirmed withdrawal can no longer debit the wallet.
pub const INSUFFICIENT_FUNDS_AT_SETTLEMENT: &str = "INSUFFICIENT_FUNDS_AT_SETTLEMENT";
/// Reason recorded when polling gives up on an in-flight transaction.
pub const ORCHESTRATION_TIMEOUT: &str = "ORCHESTRATION_TIMEOUT";

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, LedgerError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), LedgerError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| LedgerError::DatabaseError(e.to_string()))
    }
}

impl LedgerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_account(
        &self,
        phone_number: &str,
        name: &str,
        language: &str,
    ) -> Result<(UserProfile, Wallet), LedgerError> {
        let mut tx = self.pool.begin().await?;
        let user = users::insert(phone_number, name, language, &mut tx).await?;
        let wallet = wallets::create_for_user(user.id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Created account #{} for {phone_number}", user.id);
        Ok((user, wallet))
    }

    async fn fetch_user_by_phone(&self, phone_number: &str) -> Result<Option<UserProfile>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_by_phone(phone_number, &mut conn).await
    }

    async fn fetch_wallet(&self, user_id: i64) -> Result<Option<Wallet>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::fetch_for_user(user_id, &mut conn).await
    }

    async fn fetch_transaction(&self, id: i64) -> Result<Option<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        transactions::fetch_by_id(id, &mut conn).await
    }

    async fn fetch_history(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        transactions::history_for_user(user_id, limit, &mut conn).await
    }

    async fn insert_pending_transaction(&self, transaction: NewTransaction) -> Result<Transaction, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let row = transactions::insert_pending(transaction, &mut conn).await?;
        debug!("🗃️ Transaction #{} ({}) saved as pending", row.id, row.kind);
        Ok(row)
    }

    async fn mark_submitted(&self, id: i64, reference_id: &str) -> Result<Transaction, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let row = transactions::attach_reference(id, reference_id, &mut conn)
            .await?
            .ok_or(LedgerError::IllegalStatusTransition(id))?;
        debug!("🗃️ Transaction #{id} submitted with reference {reference_id}");
        Ok(row)
    }

    /// The terminal transition. The guarded status update and the wallet delta share one storage
    /// transaction, and the delta is only applied by whichever caller wins the guard.
    async fn settle_transaction(
        &self,
        id: i64,
        outcome: SettlementOutcome,
    ) -> Result<Option<Transaction>, LedgerError> {
        let (status, provider_status, provider_reason) = match &outcome {
            SettlementOutcome::Confirmed { provider_status } => {
                (TransactionStatus::Completed, Some(provider_status.as_str()), None)
            },
            SettlementOutcome::Rejected { provider_status, reason } => {
                (TransactionStatus::Failed, provider_status.as_deref(), reason.as_deref())
            },
            SettlementOutcome::TimedOut => (TransactionStatus::Failed, None, Some(ORCHESTRATION_TIMEOUT)),
        };
        let mut tx = self.pool.begin().await?;
        let Some(row) = transactions::terminalize(id, status, provider_status, provider_reason, &mut tx).await? else {
            debug!("🗃️ Transaction #{id} was already terminal. No settlement applied");
            return Ok(None);
        };
        let row = if matches!(outcome, SettlementOutcome::Confirmed { .. }) {
            apply_ledger_delta(row, &mut tx).await?
        } else {
            row
        };
        tx.commit().await?;
        debug!("🗃️ Transaction #{} settled as {}", row.id, row.status);
        Ok(Some(row))
    }

    async fn fetch_submitted_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        transactions::fetch_submitted(&mut conn).await
    }

    async fn transfer_between(
        &self,
        sender_id: i64,
        recipient_phone: &str,
        amount: Money,
        currency: Currency,
        note: Option<String>,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let wallet =
            wallets::fetch_for_user(sender_id, &mut tx).await?.ok_or(LedgerError::WalletNotFound(sender_id))?;
        let available = wallet.balance_of(currency);
        let recipient = users::fetch_by_phone(recipient_phone, &mut tx)
            .await?
            .ok_or_else(|| LedgerError::UserNotFound(recipient_phone.to_string()))?;
        if !wallets::try_debit(sender_id, currency, amount, &mut tx).await? {
            return Err(LedgerError::InsufficientFunds { currency, available, requested: amount });
        }
        wallets::credit(recipient.id, currency, amount, &mut tx).await?;
        let mut sent = NewTransaction::new(sender_id, TransactionKind::Send, amount, currency);
        sent.note = note.clone();
        let sent = transactions::insert_completed(sent, &mut tx).await?;
        let mut received = NewTransaction::new(recipient.id, TransactionKind::Receive, amount, currency);
        received.note = note;
        transactions::insert_completed(received, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ {amount} {currency} moved from user {sender_id} to user {}", recipient.id);
        Ok(sent)
    }

    async fn swap_within(
        &self,
        user_id: i64,
        from: Currency,
        to: Currency,
        amount: Money,
        converted: Money,
        note: Option<String>,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let wallet = wallets::fetch_for_user(user_id, &mut tx).await?.ok_or(LedgerError::WalletNotFound(user_id))?;
        let available = wallet.balance_of(from);
        if !wallets::try_debit(user_id, from, amount, &mut tx).await? {
            return Err(LedgerError::InsufficientFunds { currency: from, available, requested: amount });
        }
        wallets::credit(user_id, to, converted, &mut tx).await?;
        let mut swap = NewTransaction::new(user_id, TransactionKind::Swap, amount, from);
        swap.note = note;
        let row = transactions::insert_completed(swap, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ User {user_id} swapped {amount} {from} for {converted} {to}");
        Ok(row)
    }
}

/// Applies the confirmed balance delta for a mobile money transaction. Runs inside the settlement
/// storage transaction, after the caller has won the terminal-status guard.
async fn apply_ledger_delta(row: Transaction, conn: &mut SqliteConnection) -> Result<Transaction, LedgerError> {
    match row.kind {
        TransactionKind::MobileDeposit => {
            wallets::credit(row.user_id, row.currency, row.amount, conn).await?;
            Ok(row)
        },
        TransactionKind::MobileWithdrawal => {
            if wallets::try_debit(row.user_id, row.currency, row.amount, conn).await? {
                Ok(row)
            } else {
                // The submission pre-check passed, but the wallet was drained in the meantime.
                warn!(
                    "🗃️ Wallet of user {} no longer covers transaction #{}. Settling it as failed",
                    row.user_id, row.id
                );
                transactions::record_settlement_failure(row.id, INSUFFICIENT_FUNDS_AT_SETTLEMENT, conn).await
            }
        },
        other => {
            error!("🗃️ Transaction #{} of kind {other} reached provider settlement. This is a bug", row.id);
            Err(LedgerError::IllegalStatusTransition(row.id))
        },
    }
}
