use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use momo_gateway::MomoApi;
use sente_payment_engine::{
    poller::{PollConfig, PollQueue},
    PaymentFlowApi,
    SqliteDatabase,
    WalletApi,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::MomoProvider,
    poll_worker::start_status_poller,
    routes::{
        health,
        BalancesRoute,
        HistoryRoute,
        MomoDepositRoute,
        MomoWithdrawRoute,
        RegisterRoute,
        SendMoneyRoute,
        SwapCurrenciesRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    config.momo.validate().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let momo = MomoApi::new(config.momo.clone()).map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let provider = MomoProvider::new(momo);
    let queue = PollQueue::new();
    let poll = PollConfig { interval: config.poll_interval, max_consecutive_failures: config.max_poll_failures };

    // Transactions a previous process left in `Submitted` must not stay orphaned: re-arm their
    // polling before the first request comes in.
    let flow = PaymentFlowApi::new(db.clone(), provider.clone(), queue.clone(), poll);
    let recovered = flow.recover_in_flight().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if recovered > 0 {
        info!("🚀️ Recovery sweep re-armed {recovered} in-flight transactions");
    }
    let _poller = start_status_poller(flow, queue.clone());

    let srv = create_server_instance(config, db, provider, queue, poll)?;
    Ok(srv.await?)
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    provider: MomoProvider,
    queue: PollQueue,
    poll: PollConfig,
) -> Result<Server, ServerError> {
    let rates = config.rates;
    let srv = HttpServer::new(move || {
        let flow_api = PaymentFlowApi::new(db.clone(), provider.clone(), queue.clone(), poll);
        let wallet_api = WalletApi::new(db.clone(), rates);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("spg::access_log"))
            .app_data(web::Data::new(flow_api))
            .app_data(web::Data::new(wallet_api));
        let api_scope = web::scope("/api")
            .service(BalancesRoute::<SqliteDatabase>::new())
            .service(HistoryRoute::<SqliteDatabase>::new())
            .service(MomoDepositRoute::<SqliteDatabase, MomoProvider>::new())
            .service(MomoWithdrawRoute::<SqliteDatabase, MomoProvider>::new())
            .service(SendMoneyRoute::<SqliteDatabase>::new())
            .service(SwapCurrenciesRoute::<SqliteDatabase>::new());
        app.service(health).service(RegisterRoute::<SqliteDatabase>::new()).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
