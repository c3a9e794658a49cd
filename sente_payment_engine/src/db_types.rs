use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use sente_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------      Currency       ---------------------------------------------------------
/// The three balances a wallet carries: the HBAR token asset, the USDC stablecoin and CFA fiat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Currency {
    Hbar,
    Usdc,
    Cfa,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Hbar => "HBAR",
            Currency::Usdc => "USDC",
            Currency::Cfa => "CFA",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(String);

impl FromStr for Currency {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HBAR" => Ok(Self::Hbar),
            "USDC" => Ok(Self::Usdc),
            "CFA" => Ok(Self::Cfa),
            s => Err(ConversionError(format!("Invalid currency code: {s}"))),
        }
    }
}

//--------------------------------------  TransactionStatus  ---------------------------------------------------------
/// Lifecycle of a ledger transaction.
///
/// Mobile money transactions move `Pending → Submitted → Completed | Failed`; ledger-only
/// transactions (send/receive/swap) are written as `Completed` directly. `Completed` and `Failed`
/// are terminal and are never left again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum TransactionStatus {
    /// Persisted, not yet submitted to the provider.
    Pending,
    /// Submitted to the provider; a reference id has been recorded.
    Submitted,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Failed)
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "Pending"),
            TransactionStatus::Submitted => write!(f, "Submitted"),
            TransactionStatus::Completed => write!(f, "Completed"),
            TransactionStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Submitted" => Ok(Self::Submitted),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid transaction status: {s}"))),
        }
    }
}

//--------------------------------------   TransactionKind   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum TransactionKind {
    Send,
    Receive,
    Swap,
    Cashout,
    MobileDeposit,
    MobileWithdrawal,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Send => write!(f, "Send"),
            TransactionKind::Receive => write!(f, "Receive"),
            TransactionKind::Swap => write!(f, "Swap"),
            TransactionKind::Cashout => write!(f, "Cashout"),
            TransactionKind::MobileDeposit => write!(f, "MobileDeposit"),
            TransactionKind::MobileWithdrawal => write!(f, "MobileWithdrawal"),
        }
    }
}

//--------------------------------------     UserProfile     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub phone_number: String,
    pub name: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       Wallet        ---------------------------------------------------------
/// One wallet per user. Balances never go negative; every mutation happens inside an atomic
/// storage transaction guarded by a balance precondition.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub hbar_balance: Money,
    pub usdc_balance: Money,
    pub cfa_balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn balance_of(&self, currency: Currency) -> Money {
        match currency {
            Currency::Hbar => self.hbar_balance,
            Currency::Usdc => self.usdc_balance,
            Currency::Cfa => self.cfa_balance,
        }
    }
}

//--------------------------------------     Transaction     ---------------------------------------------------------
/// One ledger-affecting event. Created in `Pending` (or directly `Completed` for ledger-only
/// kinds) and terminalized exactly once; rows are never deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub amount: Money,
    pub currency: Currency,
    pub status: TransactionStatus,
    /// The provider correlation id, recorded at submission. The only handle to the external
    /// operation.
    pub reference_id: Option<String>,
    /// The provider's terminal status, recorded with the terminal transition.
    pub provider_status: Option<String>,
    /// A failure reason code, e.g. `PAYER_NOT_FOUND` or `ORCHESTRATION_TIMEOUT`.
    pub provider_reason: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    NewTransaction   ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub kind: TransactionKind,
    pub amount: Money,
    pub currency: Currency,
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn new(user_id: i64, kind: TransactionKind, amount: Money, currency: Currency) -> Self {
        Self { user_id, kind, amount, currency, note: None }
    }

    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.note = Some(note.into());
        self
    }
}
