use std::path::Path;

use log::*;
use sente_common::Money;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{
    db_types::{Currency, UserProfile, Wallet},
    sqlite::db::wallets::balance_column,
    traits::LedgerDatabase,
    SqliteDatabase,
};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    format!("sqlite://{}/sente_test_store_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        warn!("Error dropping database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("Created Sqlite database {p}");
}

/// Creates a user with an empty wallet.
pub async fn seed_account(db: &SqliteDatabase, phone: &str, name: &str) -> (UserProfile, Wallet) {
    db.create_account(phone, name, "fr").await.expect("Error seeding account")
}

/// Tops up a wallet balance directly, bypassing the payment flows.
pub async fn fund_wallet(db: &SqliteDatabase, user_id: i64, currency: Currency, amount: Money) {
    let column = balance_column(currency);
    let query = format!("UPDATE wallets SET {column} = {column} + $1 WHERE user_id = $2");
    sqlx::query(&query).bind(amount).bind(user_id).execute(db.pool()).await.expect("Error funding wallet");
}
