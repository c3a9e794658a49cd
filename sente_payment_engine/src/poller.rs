//! Poll scheduling for in-flight mobile money transactions.
//!
//! Instead of chaining ad hoc timers, every submitted transaction gets an explicit work item in
//! the [`PollQueue`]. A worker loop (hosted by the server binary) drains due entries, runs one
//! status check each via [`crate::PaymentFlowApi::check_in_flight`], and feeds the resulting
//! [`PollDecision`] back into the queue.
use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use log::*;
use tokio::sync::Mutex;

use crate::db_types::{Transaction, TransactionKind};

//--------------------------------------     PollConfig      ---------------------------------------------------------
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between consecutive status checks for one reference.
    pub interval: Duration,
    /// Consecutive failed checks tolerated before an in-flight transaction is abandoned.
    pub max_consecutive_failures: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: Duration::seconds(5), max_consecutive_failures: 5 }
    }
}

//--------------------------------------     PollEntry       ---------------------------------------------------------
/// One scheduled status check for an in-flight transaction.
#[derive(Debug, Clone)]
pub struct PollEntry {
    pub transaction_id: i64,
    pub reference_id: String,
    pub kind: TransactionKind,
    pub attempts: u32,
    pub consecutive_failures: u32,
    pub next_run_at: DateTime<Utc>,
}

impl PollEntry {
    pub fn first(transaction_id: i64, reference_id: String, kind: TransactionKind, delay: Duration) -> Self {
        Self {
            transaction_id,
            reference_id,
            kind,
            attempts: 0,
            consecutive_failures: 0,
            next_run_at: Utc::now() + delay,
        }
    }
}

//--------------------------------------    PollDecision     ---------------------------------------------------------
/// What a status check decided about the next step for its reference.
#[derive(Debug)]
pub enum PollDecision {
    /// Still pending, or a tolerated check failure. Check again at `next_run_at`.
    Reschedule(PollEntry),
    /// A terminal state was reached and recorded.
    Settled(Transaction),
    /// Nothing left to do for this reference.
    Finished,
}

//--------------------------------------     PollQueue       ---------------------------------------------------------
/// The work queue consumed by the status poll worker.
///
/// At most one entry per reference id is tracked at any time. An entry taken via
/// [`PollQueue::take_due`] stays tracked while its check runs, so two checks for the same
/// reference can never overlap; the worker either re-queues it with
/// [`PollQueue::reschedule`] or releases it with [`PollQueue::finish`].
#[derive(Clone, Default)]
pub struct PollQueue {
    inner: Arc<Mutex<QueueInner>>,
}

#[derive(Default)]
struct QueueInner {
    entries: Vec<PollEntry>,
    tracked: HashSet<String>,
}

impl PollQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a reference. Returns false, changing nothing, when the reference is
    /// already tracked.
    pub async fn schedule(&self, entry: PollEntry) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.tracked.insert(entry.reference_id.clone()) {
            warn!("⏱️ Reference {} is already being polled. Ignoring the duplicate schedule", entry.reference_id);
            return false;
        }
        trace!("⏱️ Scheduled a status check for {} at {}", entry.reference_id, entry.next_run_at);
        inner.entries.push(entry);
        true
    }

    /// Re-queues an entry whose check decided to keep polling.
    pub async fn reschedule(&self, entry: PollEntry) {
        let mut inner = self.inner.lock().await;
        inner.tracked.insert(entry.reference_id.clone());
        inner.entries.push(entry);
    }

    /// Removes and returns every entry whose check is due. The references stay tracked until
    /// [`PollQueue::finish`] or [`PollQueue::reschedule`] is called for them.
    pub async fn take_due(&self, now: DateTime<Utc>) -> Vec<PollEntry> {
        let mut inner = self.inner.lock().await;
        let (due, rest): (Vec<PollEntry>, Vec<PollEntry>) =
            std::mem::take(&mut inner.entries).into_iter().partition(|e| e.next_run_at <= now);
        inner.entries = rest;
        due
    }

    /// Stops tracking a reference that reached a terminal state.
    pub async fn finish(&self, reference_id: &str) {
        let mut inner = self.inner.lock().await;
        inner.tracked.remove(reference_id);
    }

    pub async fn tracked_count(&self) -> usize {
        self.inner.lock().await.tracked.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(reference: &str, delay_secs: i64) -> PollEntry {
        PollEntry::first(1, reference.to_string(), TransactionKind::MobileDeposit, Duration::seconds(delay_secs))
    }

    #[tokio::test]
    async fn duplicate_references_are_scheduled_once() {
        let queue = PollQueue::new();
        assert!(queue.schedule(entry("R1", 0)).await);
        assert!(!queue.schedule(entry("R1", 0)).await);
        assert_eq!(queue.tracked_count().await, 1);
        assert_eq!(queue.take_due(Utc::now()).await.len(), 1);
    }

    #[tokio::test]
    async fn only_due_entries_are_taken() {
        let queue = PollQueue::new();
        queue.schedule(entry("due", 0)).await;
        queue.schedule(entry("later", 3600)).await;
        let due = queue.take_due(Utc::now()).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].reference_id, "due");
        // The not-yet-due entry is still queued and both references remain tracked.
        assert_eq!(queue.tracked_count().await, 2);
    }

    #[tokio::test]
    async fn finished_references_can_be_scheduled_again() {
        let queue = PollQueue::new();
        queue.schedule(entry("R1", 0)).await;
        queue.take_due(Utc::now()).await;
        queue.finish("R1").await;
        assert_eq!(queue.tracked_count().await, 0);
        assert!(queue.schedule(entry("R1", 0)).await);
    }
}
