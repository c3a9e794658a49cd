//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module
//! neat and tidy 🙏
//!
//! Every long, non-cpu-bound operation (I/O, database access, provider calls) is expressed as an
//! async function so worker threads keep serving other requests while it is in flight.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use sente_payment_engine::{
    objects::{MobileMoneyRequest, RegisterRequest, SendRequest, SwapRequest},
    traits::{LedgerDatabase, MobileMoneyProvider},
    PaymentFlowApi,
    WalletApi,
};
use serde::Deserialize;

use crate::{data_objects::AccountCreated, errors::ServerError, helpers::AuthenticatedUser};

// Actix cannot register generic handlers through its attribute macros, so the route! macro builds
// the service registration manually.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Balances  ----------------------------------------------------
route!(balances => Get "/balances" impl LedgerDatabase);
pub async fn balances<TLedgerDatabase: LedgerDatabase>(
    user: AuthenticatedUser,
    api: web::Data<WalletApi<TLedgerDatabase>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Balance request from user {}", user.0);
    let sheet = api.balances(user.0).await?;
    Ok(HttpResponse::Ok().json(sheet))
}

//----------------------------------------------  History  ----------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

route!(history => Get "/transactions" impl LedgerDatabase);
pub async fn history<TLedgerDatabase: LedgerDatabase>(
    user: AuthenticatedUser,
    api: web::Data<WalletApi<TLedgerDatabase>>,
    params: web::Query<HistoryParams>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ History request from user {}", user.0);
    let transactions = api.history(user.0, params.limit).await?;
    Ok(HttpResponse::Ok().json(transactions))
}

//--------------------------------------------  Mobile money  --------------------------------------------------
route!(momo_deposit => Post "/momo/deposit" impl LedgerDatabase, MobileMoneyProvider);
/// Initiates a mobile money deposit. Returns as soon as the transaction is submitted to the
/// provider; the terminal outcome shows up in the transaction history once polling settles it.
pub async fn momo_deposit<TLedgerDatabase, TMobileMoneyProvider>(
    user: AuthenticatedUser,
    api: web::Data<PaymentFlowApi<TLedgerDatabase, TMobileMoneyProvider>>,
    body: web::Json<MobileMoneyRequest>,
) -> Result<HttpResponse, ServerError>
where
    TLedgerDatabase: LedgerDatabase,
    TMobileMoneyProvider: MobileMoneyProvider,
{
    debug!("💻️💰️ Deposit request from user {}", user.0);
    let receipt = api.initiate_deposit(user.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

route!(momo_withdraw => Post "/momo/withdraw" impl LedgerDatabase, MobileMoneyProvider);
pub async fn momo_withdraw<TLedgerDatabase, TMobileMoneyProvider>(
    user: AuthenticatedUser,
    api: web::Data<PaymentFlowApi<TLedgerDatabase, TMobileMoneyProvider>>,
    body: web::Json<MobileMoneyRequest>,
) -> Result<HttpResponse, ServerError>
where
    TLedgerDatabase: LedgerDatabase,
    TMobileMoneyProvider: MobileMoneyProvider,
{
    debug!("💻️💸️ Withdrawal request from user {}", user.0);
    let receipt = api.initiate_withdrawal(user.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

//----------------------------------------------    Send   ----------------------------------------------------
route!(send_money => Post "/send" impl LedgerDatabase);
pub async fn send_money<TLedgerDatabase: LedgerDatabase>(
    user: AuthenticatedUser,
    api: web::Data<WalletApi<TLedgerDatabase>>,
    body: web::Json<SendRequest>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Send request from user {}", user.0);
    let row = api.send(user.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

//----------------------------------------------    Swap   ----------------------------------------------------
route!(swap_currencies => Post "/swap" impl LedgerDatabase);
pub async fn swap_currencies<TLedgerDatabase: LedgerDatabase>(
    user: AuthenticatedUser,
    api: web::Data<WalletApi<TLedgerDatabase>>,
    body: web::Json<SwapRequest>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Swap request from user {}", user.0);
    let row = api.swap(user.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

//----------------------------------------------  Register  ----------------------------------------------------
route!(register => Post "/register" impl LedgerDatabase);
pub async fn register<TLedgerDatabase: LedgerDatabase>(
    api: web::Data<WalletApi<TLedgerDatabase>>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Registration request");
    let (user, _wallet) = api.register(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AccountCreated { user_id: user.id, phone_number: user.phone_number }))
}
