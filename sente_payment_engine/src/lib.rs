//! Sente Payment Engine
//!
//! The engine owns the wallet ledger and the mobile money payment orchestration for the Sente
//! wallet service. It is provider-agnostic: the actual mobile money network sits behind the
//! [`traits::MobileMoneyProvider`] seam, and storage backends implement
//! [`traits::LedgerDatabase`]. Currently SQLite is the only storage backend.
//!
//! The library is divided into three main sections:
//! 1. Database management and control (the `sqlite` module). You should never need to access the
//!    database directly; use the public APIs instead. The exception is the data types used in the
//!    database, which are defined in [`db_types`] and are public.
//! 2. The flow APIs: [`PaymentFlowApi`] drives the deposit/withdrawal state machine against the
//!    provider, and [`WalletApi`] covers the ledger-only operations (balances, history, send,
//!    swap, registration).
//! 3. The [`poller`] module, which holds the work queue consumed by the status poll worker.
mod flow;

#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
pub mod helpers;
pub mod poller;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteDatabase, INSUFFICIENT_FUNDS_AT_SETTLEMENT, ORCHESTRATION_TIMEOUT};

pub use flow::{objects, PaymentFlowApi, PaymentFlowError, WalletApi};
