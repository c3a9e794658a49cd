mod support;

use chrono::Utc;
use sente_common::Money;
use sente_payment_engine::{
    db_types::{Currency, NewTransaction, TransactionKind, TransactionStatus},
    poller::PollDecision,
    test_utils::seed_account,
    traits::{LedgerDatabase, ProviderStatus},
};
use support::{new_flow_api, ScriptedProvider};

#[tokio::test]
async fn startup_sweep_rearms_submitted_transactions() {
    let provider = ScriptedProvider::new();
    provider.report_status(ProviderStatus::Successful);
    let api = new_flow_api(provider).await;
    let (user, _) = seed_account(api.db(), "+22912345678", "Awa").await;

    // A transaction a previous process left in `Submitted` with no scheduled check.
    let row = api
        .db()
        .insert_pending_transaction(NewTransaction::new(
            user.id,
            TransactionKind::MobileDeposit,
            Money::from_whole(250),
            Currency::Cfa,
        ))
        .await
        .unwrap();
    let row = api.db().mark_submitted(row.id, "R-orphan").await.unwrap();
    assert_eq!(row.status, TransactionStatus::Submitted);
    assert!(!row.status.is_terminal());
    assert_eq!(api.queue().tracked_count().await, 0);

    let armed = api.recover_in_flight().await.unwrap();
    assert_eq!(armed, 1);
    // A second sweep finds the reference already tracked and re-arms nothing.
    assert_eq!(api.recover_in_flight().await.unwrap(), 0);

    let entry = api.queue().take_due(Utc::now()).await.pop().expect("the sweep scheduled no poll");
    assert_eq!(entry.reference_id, "R-orphan");
    let settled = match api.check_in_flight(entry).await {
        PollDecision::Settled(t) => t,
        other => panic!("expected a settlement, got {other:?}"),
    };
    assert_eq!(settled.status, TransactionStatus::Completed);
    let wallet = api.db().fetch_wallet(user.id).await.unwrap().unwrap();
    assert_eq!(wallet.cfa_balance, Money::from_whole(250));
}

#[tokio::test]
async fn sweep_ignores_terminal_transactions() {
    let provider = ScriptedProvider::new();
    provider.accept_submission("R1");
    provider.report_status(ProviderStatus::Failed { reason: None });
    let api = new_flow_api(provider).await;
    let (user, _) = seed_account(api.db(), "+22912345678", "Awa").await;

    let request = sente_payment_engine::objects::MobileMoneyRequest {
        amount: "100".to_string(),
        phone_number: "+22912345678".to_string(),
        note: None,
    };
    api.initiate_deposit(user.id, request).await.expect("deposit failed");
    let entry = api.queue().take_due(Utc::now()).await.pop().expect("no poll was scheduled");
    assert!(matches!(api.check_in_flight(entry).await, PollDecision::Settled(_)));
    api.queue().finish("R1").await;

    assert_eq!(api.recover_in_flight().await.unwrap(), 0);
}
