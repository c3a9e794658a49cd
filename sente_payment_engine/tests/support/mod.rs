#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Duration;
use sente_payment_engine::{
    objects::FxRates,
    poller::{PollConfig, PollQueue},
    test_utils,
    traits::{MobileMoneyProvider, PaymentInstruction, ProviderError, ProviderStatus},
    PaymentFlowApi,
    SqliteDatabase,
    WalletApi,
};

/// A provider double with scripted responses, recording every call it receives.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    inner: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    submissions: VecDeque<Result<String, ProviderError>>,
    statuses: VecDeque<Result<ProviderStatus, ProviderError>>,
    submitted: Vec<PaymentInstruction>,
    status_lookups: Vec<String>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept_submission(&self, reference: &str) {
        self.inner.lock().unwrap().submissions.push_back(Ok(reference.to_string()));
    }

    pub fn reject_submission(&self, status: u16, reason: &str) {
        self.inner
            .lock()
            .unwrap()
            .submissions
            .push_back(Err(ProviderError::Rejected { status, reason: reason.to_string() }));
    }

    pub fn report_status(&self, status: ProviderStatus) {
        self.inner.lock().unwrap().statuses.push_back(Ok(status));
    }

    pub fn report_outage(&self) {
        self.inner
            .lock()
            .unwrap()
            .statuses
            .push_back(Err(ProviderError::Unreachable("connection refused".to_string())));
    }

    pub fn submission_count(&self) -> usize {
        self.inner.lock().unwrap().submitted.len()
    }

    pub fn last_submission(&self) -> Option<PaymentInstruction> {
        self.inner.lock().unwrap().submitted.last().cloned()
    }

    pub fn status_lookup_count(&self) -> usize {
        self.inner.lock().unwrap().status_lookups.len()
    }

    fn submit(&self, instruction: PaymentInstruction) -> Result<String, ProviderError> {
        let mut script = self.inner.lock().unwrap();
        script.submitted.push(instruction);
        script.submissions.pop_front().expect("no scripted submission response left")
    }

    fn status(&self, reference: &str) -> Result<ProviderStatus, ProviderError> {
        let mut script = self.inner.lock().unwrap();
        script.status_lookups.push(reference.to_string());
        script.statuses.pop_front().expect("no scripted status response left")
    }
}

impl MobileMoneyProvider for ScriptedProvider {
    async fn request_to_pay(&self, instruction: PaymentInstruction) -> Result<String, ProviderError> {
        self.submit(instruction)
    }

    async fn transfer(&self, instruction: PaymentInstruction) -> Result<String, ProviderError> {
        self.submit(instruction)
    }

    async fn collection_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError> {
        self.status(reference_id)
    }

    async fn disbursement_status(&self, reference_id: &str) -> Result<ProviderStatus, ProviderError> {
        self.status(reference_id)
    }
}

pub async fn new_test_db() -> SqliteDatabase {
    let url = test_utils::random_db_path();
    test_utils::prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

/// A flow api over a fresh database, with a zero poll interval so scheduled checks are due
/// immediately.
pub async fn new_flow_api(provider: ScriptedProvider) -> PaymentFlowApi<SqliteDatabase, ScriptedProvider> {
    let db = new_test_db().await;
    let poll = PollConfig { interval: Duration::zero(), max_consecutive_failures: 5 };
    PaymentFlowApi::new(db, provider, PollQueue::new(), poll)
}

pub fn new_wallet_api(db: SqliteDatabase) -> WalletApi<SqliteDatabase> {
    WalletApi::new(db, FxRates::default())
}
