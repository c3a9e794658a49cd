use chrono::Utc;
use mockall::mock;
use sente_common::Money;
use sente_payment_engine::{
    db_types::{Currency, NewTransaction, Transaction, TransactionKind, TransactionStatus, UserProfile, Wallet},
    traits::{
        LedgerDatabase,
        LedgerError,
        MobileMoneyProvider,
        PaymentInstruction,
        ProviderError,
        ProviderStatus,
        SettlementOutcome,
    },
};

mock! {
    pub Ledger {}
    impl LedgerDatabase for Ledger {
        fn url(&self) -> &str;
        async fn create_account(&self, phone_number: &str, name: &str, language: &str) -> Result<(UserProfile, Wallet), LedgerError>;
        async fn fetch_user_by_phone(&self, phone_number: &str) -> Result<Option<UserProfile>, LedgerError>;
        async fn fetch_wallet(&self, user_id: i64) -> Result<Option<Wallet>, LedgerError>;
        async fn fetch_transaction(&self, id: i64) -> Result<Option<Transaction>, LedgerError>;
        async fn fetch_history(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>, LedgerError>;
        async fn insert_pending_transaction(&self, transaction: NewTransaction) -> Result<Transaction, LedgerError>;
        async fn mark_submitted(&self, id: i64, reference_id: &str) -> Result<Transaction, LedgerError>;
        async fn settle_transaction(&self, id: i64, outcome: SettlementOutcome) -> Result<Option<Transaction>, LedgerError>;
        async fn fetch_submitted_transactions(&self) -> Result<Vec<Transaction>, LedgerError>;
        async fn transfer_between(&self, sender_id: i64, recipient_phone: &str, amount: Money, currency: Currency, note: Option<String>) -> Result<Transaction, LedgerError>;
        async fn swap_within(&self, user_id: i64, from: Currency, to: Currency, amount: Money, converted: Money, note: Option<String>) -> Result<Transaction, LedgerError>;
    }
}

mock! {
    pub Provider {}
    impl MobileMoneyProvider for Provider {
        async fn request_to_pay(&self, instruction: PaymentInstruction) -> Result<String, ProviderError>;
        async fn transfer(&self, instruction: PaymentInstruction) -> Result<String, ProviderError>;
        async fn collection_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError>;
        async fn disbursement_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError>;
    }
}

pub fn row(id: i64, tx: &NewTransaction, status: TransactionStatus) -> Transaction {
    Transaction {
        id,
        user_id: tx.user_id,
        kind: tx.kind,
        amount: tx.amount,
        currency: tx.currency,
        status,
        reference_id: None,
        provider_status: None,
        provider_reason: None,
        note: tx.note.clone(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn submitted_row(id: i64, reference_id: &str) -> Transaction {
    Transaction {
        id,
        user_id: 1,
        kind: TransactionKind::MobileDeposit,
        amount: Money::from_whole(1000),
        currency: Currency::Cfa,
        status: TransactionStatus::Submitted,
        reference_id: Some(reference_id.to_string()),
        provider_status: None,
        provider_reason: None,
        note: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn failed_row(id: i64) -> Transaction {
    Transaction {
        id,
        user_id: 1,
        kind: TransactionKind::MobileDeposit,
        amount: Money::from_whole(1000),
        currency: Currency::Cfa,
        status: TransactionStatus::Failed,
        reference_id: None,
        provider_status: None,
        provider_reason: Some("provider unreachable".to_string()),
        note: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn wallet_with_cfa(user_id: i64, cfa: Money) -> Wallet {
    Wallet {
        id: 1,
        user_id,
        hbar_balance: Money::zero(),
        usdc_balance: Money::zero(),
        cfa_balance: cfa,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
