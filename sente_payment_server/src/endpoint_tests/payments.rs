use actix_web::{http::StatusCode, test, web, App};
use sente_common::Money;
use sente_payment_engine::{
    db_types::TransactionStatus,
    poller::{PollConfig, PollQueue},
    traits::ProviderError,
    PaymentFlowApi,
};
use serde_json::json;

use crate::{
    endpoint_tests::mocks::{failed_row, row, submitted_row, wallet_with_cfa, MockLedger, MockProvider},
    helpers::USER_ID_HEADER,
    routes::{MomoDepositRoute, MomoWithdrawRoute},
};

fn flow_data(db: MockLedger, provider: MockProvider) -> web::Data<PaymentFlowApi<MockLedger, MockProvider>> {
    web::Data::new(PaymentFlowApi::new(db, provider, PollQueue::new(), PollConfig::default()))
}

macro_rules! payments_app {
    ($db:expr, $provider:expr) => {
        test::init_service(
            App::new().app_data(flow_data($db, $provider)).service(
                web::scope("/api")
                    .service(MomoDepositRoute::<MockLedger, MockProvider>::new())
                    .service(MomoWithdrawRoute::<MockLedger, MockProvider>::new()),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn deposit_returns_the_submission_receipt() {
    let mut db = MockLedger::new();
    db.expect_insert_pending_transaction()
        .returning(|tx| Ok(row(7, &tx, TransactionStatus::Pending)));
    db.expect_mark_submitted().returning(|id, reference| Ok(submitted_row(id, reference)));
    let mut provider = MockProvider::new();
    provider.expect_request_to_pay().returning(|_| Ok("R1".to_string()));

    let app = payments_app!(db, provider);
    let req = test::TestRequest::post()
        .uri("/api/momo/deposit")
        .insert_header((USER_ID_HEADER, "1"))
        .set_json(json!({"amount": "1000", "phoneNumber": "+22912345678"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["transactionId"], 7);
    assert_eq!(body["referenceId"], "R1");
}

#[actix_web::test]
async fn requests_without_a_user_header_are_rejected() {
    let app = payments_app!(MockLedger::new(), MockProvider::new());
    let req = test::TestRequest::post()
        .uri("/api/momo/deposit")
        .set_json(json!({"amount": "1000", "phoneNumber": "+22912345678"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_amounts_are_rejected_without_touching_the_backend() {
    // No expectations: any backend call would panic the mock.
    let app = payments_app!(MockLedger::new(), MockProvider::new());
    let req = test::TestRequest::post()
        .uri("/api/momo/deposit")
        .insert_header((USER_ID_HEADER, "1"))
        .set_json(json!({"amount": "ten", "phoneNumber": "+22912345678"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn withdrawal_with_insufficient_funds_is_rejected() {
    let mut db = MockLedger::new();
    db.expect_fetch_wallet().returning(|user_id| Ok(Some(wallet_with_cfa(user_id, Money::from_whole(500)))));

    let app = payments_app!(db, MockProvider::new());
    let req = test::TestRequest::post()
        .uri("/api/momo/withdraw")
        .insert_header((USER_ID_HEADER, "1"))
        .set_json(json!({"amount": "1000", "phoneNumber": "+22912345678"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Insufficient CFA balance"), "unexpected error body: {message}");
}

#[actix_web::test]
async fn provider_outage_at_submission_maps_to_service_unavailable() {
    let mut db = MockLedger::new();
    db.expect_insert_pending_transaction()
        .returning(|tx| Ok(row(9, &tx, TransactionStatus::Pending)));
    db.expect_settle_transaction().returning(|id, _| Ok(Some(failed_row(id))));
    let mut provider = MockProvider::new();
    provider
        .expect_request_to_pay()
        .returning(|_| Err(ProviderError::Unreachable("connection refused".to_string())));

    let app = payments_app!(db, provider);
    let req = test::TestRequest::post()
        .uri("/api/momo/deposit")
        .insert_header((USER_ID_HEADER, "1"))
        .set_json(json!({"amount": "1000", "phoneNumber": "+22912345678"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
