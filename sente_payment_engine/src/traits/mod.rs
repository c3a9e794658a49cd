//! Interface contracts of the payment engine.
//!
//! * [`LedgerDatabase`] defines the storage behaviour a backend must expose: wallet and user
//!   lookups, transaction persistence, and the guarded atomic settlement write.
//! * [`MobileMoneyProvider`] is the seam between the payment orchestrator and the external mobile
//!   money network. The engine never talks to the network directly, which keeps it testable with
//!   a scripted provider double.
mod ledger_database;
mod mobile_money;

pub use ledger_database::{LedgerDatabase, LedgerError, SettlementOutcome};
pub use mobile_money::{MobileMoneyProvider, PaymentInstruction, ProviderError, ProviderStatus};
