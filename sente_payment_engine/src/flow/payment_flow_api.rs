use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sente_common::Money;

use crate::{
    db_types::{Currency, NewTransaction, Transaction, TransactionKind},
    flow::{
        errors::PaymentFlowError,
        objects::{MobileMoneyRequest, PaymentReceipt},
        parse_amount,
    },
    helpers::normalize_msisdn,
    poller::{PollConfig, PollDecision, PollEntry, PollQueue},
    traits::{LedgerDatabase, MobileMoneyProvider, PaymentInstruction, ProviderStatus, SettlementOutcome},
};

/// `PaymentFlowApi` owns the deposit/withdrawal state machine. It persists the pending ledger
/// transaction, submits it to the provider, arms status polling, and performs the atomic
/// terminal transition once the provider settles.
///
/// The initiating caller gets its answer as soon as the transaction reaches `Submitted`; the
/// terminal outcome is only observable later through the transaction history.
#[derive(Clone)]
pub struct PaymentFlowApi<B, P> {
    db: B,
    provider: P,
    queue: PollQueue,
    poll: PollConfig,
}

impl<B, P> Debug for PaymentFlowApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B, P> PaymentFlowApi<B, P>
where
    B: LedgerDatabase,
    P: MobileMoneyProvider,
{
    pub fn new(db: B, provider: P, queue: PollQueue, poll: PollConfig) -> Self {
        Self { db, provider, queue, poll }
    }

    /// Starts a mobile money deposit: the payer approves on their handset and the CFA balance is
    /// credited once the provider confirms.
    pub async fn initiate_deposit(
        &self,
        user_id: i64,
        request: MobileMoneyRequest,
    ) -> Result<PaymentReceipt, PaymentFlowError> {
        let (amount, msisdn) = validate(&request)?;
        let transaction = NewTransaction {
            user_id,
            kind: TransactionKind::MobileDeposit,
            amount,
            currency: Currency::Cfa,
            note: request.note,
        };
        let row = self.db.insert_pending_transaction(transaction).await?;
        debug!("🔄️💰️ Deposit transaction #{} created for user {user_id}", row.id);
        self.submit(row, msisdn, amount).await
    }

    /// Starts a mobile money withdrawal. The wallet must cover the amount before anything is
    /// persisted or sent to the provider; the actual debit only happens at confirmation.
    pub async fn initiate_withdrawal(
        &self,
        user_id: i64,
        request: MobileMoneyRequest,
    ) -> Result<PaymentReceipt, PaymentFlowError> {
        let (amount, msisdn) = validate(&request)?;
        let wallet = self.db.fetch_wallet(user_id).await?.ok_or(PaymentFlowError::WalletNotFound(user_id))?;
        let available = wallet.cfa_balance;
        if available < amount {
            return Err(PaymentFlowError::InsufficientFunds { currency: Currency::Cfa, available, requested: amount });
        }
        let transaction = NewTransaction {
            user_id,
            kind: TransactionKind::MobileWithdrawal,
            amount,
            currency: Currency::Cfa,
            note: request.note,
        };
        let row = self.db.insert_pending_transaction(transaction).await?;
        debug!("🔄️💸️ Withdrawal transaction #{} created for user {user_id}", row.id);
        self.submit(row, msisdn, amount).await
    }

    /// Submits a pending transaction to the provider: `Pending → Submitted` with the returned
    /// reference id, or `Pending → Failed` when the provider turns it down.
    async fn submit(
        &self,
        row: Transaction,
        msisdn: String,
        amount: Money,
    ) -> Result<PaymentReceipt, PaymentFlowError> {
        let instruction = PaymentInstruction {
            amount,
            currency: row.currency,
            msisdn,
            external_id: row.id.to_string(),
            note: row.note.clone(),
        };
        let submission = match row.kind {
            TransactionKind::MobileDeposit => self.provider.request_to_pay(instruction).await,
            _ => self.provider.transfer(instruction).await,
        };
        match submission {
            Ok(reference_id) => {
                let row = self.db.mark_submitted(row.id, &reference_id).await?;
                self.queue.schedule(PollEntry::first(row.id, reference_id.clone(), row.kind, self.poll.interval)).await;
                info!("🔄️ Transaction #{} submitted to the provider [{reference_id}]", row.id);
                Ok(PaymentReceipt { transaction_id: row.id, reference_id })
            },
            Err(e) => {
                warn!("🔄️ Submission of transaction #{} failed: {e}", row.id);
                let outcome = SettlementOutcome::Rejected { provider_status: None, reason: Some(e.to_string()) };
                self.db.settle_transaction(row.id, outcome).await?;
                Err(e.into())
            },
        }
    }

    /// Runs one status check for an in-flight transaction and decides what happens next.
    ///
    /// While the provider reports `PENDING` the entry is rescheduled; a terminal report triggers
    /// the atomic settlement; and after `max_consecutive_failures` failed checks in a row the
    /// transaction is abandoned as failed rather than polled forever.
    pub async fn check_in_flight(&self, mut entry: PollEntry) -> PollDecision {
        let status = match entry.kind {
            TransactionKind::MobileDeposit => self.provider.collection_status(&entry.reference_id).await,
            _ => self.provider.disbursement_status(&entry.reference_id).await,
        };
        entry.attempts += 1;
        match status {
            Ok(ProviderStatus::Pending) => {
                entry.consecutive_failures = 0;
                entry.next_run_at = Utc::now() + self.poll.interval;
                trace!("🔄️ [{}] still pending after {} checks", entry.reference_id, entry.attempts);
                PollDecision::Reschedule(entry)
            },
            Ok(ProviderStatus::Successful) => {
                self.settle(&entry, SettlementOutcome::Confirmed { provider_status: "SUCCESSFUL".to_string() }).await
            },
            Ok(ProviderStatus::Failed { reason }) => {
                self.settle(&entry, SettlementOutcome::Rejected { provider_status: Some("FAILED".to_string()), reason })
                    .await
            },
            Err(e) => {
                entry.consecutive_failures += 1;
                if entry.consecutive_failures >= self.poll.max_consecutive_failures {
                    warn!(
                        "🔄️ [{}] gave {} consecutive check failures. Giving up: {e}",
                        entry.reference_id, entry.consecutive_failures
                    );
                    self.settle(&entry, SettlementOutcome::TimedOut).await
                } else {
                    warn!("🔄️ [{}] status check failed ({e}). Retrying", entry.reference_id);
                    entry.next_run_at = Utc::now() + self.poll.interval;
                    PollDecision::Reschedule(entry)
                }
            },
        }
    }

    async fn settle(&self, entry: &PollEntry, outcome: SettlementOutcome) -> PollDecision {
        match self.db.settle_transaction(entry.transaction_id, outcome).await {
            Ok(Some(row)) => {
                info!("🔄️ Transaction #{} settled as {} [{}]", row.id, row.status, entry.reference_id);
                PollDecision::Settled(row)
            },
            Ok(None) => {
                debug!("🔄️ Transaction #{} was already terminal. Dropping the poll", entry.transaction_id);
                PollDecision::Finished
            },
            Err(e) => {
                // A storage failure competes with the next poll attempt. Retry within the same
                // failure budget rather than losing the reference.
                error!("🔄️ Could not settle transaction #{}: {e}", entry.transaction_id);
                let mut entry = entry.clone();
                entry.consecutive_failures += 1;
                if entry.consecutive_failures >= self.poll.max_consecutive_failures {
                    PollDecision::Finished
                } else {
                    entry.next_run_at = Utc::now() + self.poll.interval;
                    PollDecision::Reschedule(entry)
                }
            },
        }
    }

    /// Re-arms polling for every transaction left in `Submitted`, typically after a restart
    /// abandoned their scheduled checks. Returns how many transactions were re-armed.
    pub async fn recover_in_flight(&self) -> Result<usize, PaymentFlowError> {
        let stuck = self.db.fetch_submitted_transactions().await?;
        let mut armed = 0;
        for row in stuck {
            let Some(reference_id) = row.reference_id.clone() else { continue };
            if self.queue.schedule(PollEntry::first(row.id, reference_id, row.kind, self.poll.interval)).await {
                armed += 1;
            }
        }
        if armed > 0 {
            info!("🔄️ Re-armed polling for {armed} in-flight transactions");
        }
        Ok(armed)
    }

    pub fn queue(&self) -> &PollQueue {
        &self.queue
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn validate(request: &MobileMoneyRequest) -> Result<(Money, String), PaymentFlowError> {
    let amount = parse_amount(&request.amount)?;
    let msisdn = normalize_msisdn(&request.phone_number)
        .ok_or_else(|| PaymentFlowError::ValidationError(format!("{} is not a valid phone number", request.phone_number)))?;
    Ok((amount, msisdn))
}
