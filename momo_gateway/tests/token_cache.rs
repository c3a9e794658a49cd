use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use actix_web::{web, App, HttpResponse, HttpServer};
use momo_gateway::{MomoApiError, MomoConfig, TokenManager};
use sente_common::Secret;

fn test_config(port: u16) -> MomoConfig {
    MomoConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        subscription_key: Secret::new("sub-key".to_string()),
        api_user: "api-user".to_string(),
        api_key: Secret::new("api-key".to_string()),
        target_environment: "sandbox".to_string(),
        callback_host: "localhost".to_string(),
    }
}

fn token_manager(port: u16) -> TokenManager {
    TokenManager::new(test_config(port), Arc::new(reqwest::Client::new()))
}

/// Stands in for the provider's token endpoint. Counts exchanges so tests can assert on how many
/// network calls actually happened.
async fn start_token_endpoint(expires_in: u64, status: u16) -> (u16, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let endpoint_hits = hits.clone();
    let srv = HttpServer::new(move || {
        let hits = endpoint_hits.clone();
        App::new().route(
            "/v1_0/token",
            web::post().to(move || {
                let hits = hits.clone();
                async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                    if status == 200 {
                        HttpResponse::Ok().json(serde_json::json!({
                            "access_token": format!("tok-{n}"),
                            "token_type": "Bearer",
                            "expires_in": expires_in,
                        }))
                    } else {
                        HttpResponse::Unauthorized().body("bad credentials")
                    }
                }
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Error binding test token endpoint");
    let port = srv.addrs()[0].port();
    actix_web::rt::spawn(srv.run());
    (port, hits)
}

#[actix_web::test]
async fn token_is_cached_within_its_ttl() {
    let (port, hits) = start_token_endpoint(3600, 200).await;
    let tokens = token_manager(port);
    let first = tokens.bearer_token().await.expect("first exchange failed");
    let second = tokens.bearer_token().await.expect("cached lookup failed");
    assert_eq!(first, "tok-1");
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn expired_token_triggers_a_fresh_exchange() {
    // A zero TTL is inside the expiry safety margin, so every call must re-exchange.
    let (port, hits) = start_token_endpoint(0, 200).await;
    let tokens = token_manager(port);
    let first = tokens.bearer_token().await.expect("first exchange failed");
    let second = tokens.bearer_token().await.expect("second exchange failed");
    assert_eq!(first, "tok-1");
    assert_eq!(second, "tok-2");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn concurrent_callers_share_one_exchange() {
    let (port, hits) = start_token_endpoint(3600, 200).await;
    let tokens = token_manager(port);
    let (a, b) = tokio::join!(tokens.bearer_token(), tokens.bearer_token());
    assert_eq!(a.expect("exchange failed"), b.expect("exchange failed"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn failed_exchange_surfaces_as_auth_error() {
    let (port, hits) = start_token_endpoint(3600, 401).await;
    let tokens = token_manager(port);
    let err = tokens.bearer_token().await.expect_err("exchange should have failed");
    assert!(matches!(err, MomoApiError::Auth(_)), "unexpected error: {err:?}");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
