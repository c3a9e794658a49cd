use sente_common::Money;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Currency, Wallet},
    traits::LedgerError,
};

pub(crate) fn balance_column(currency: Currency) -> &'static str {
    match currency {
        Currency::Hbar => "hbar_balance",
        Currency::Usdc => "usdc_balance",
        Currency::Cfa => "cfa_balance",
    }
}

pub async fn create_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Wallet, LedgerError> {
    let wallet = sqlx::query_as(r#"INSERT INTO wallets (user_id) VALUES ($1) RETURNING *;"#)
        .bind(user_id)
        .fetch_one(conn)
        .await?;
    Ok(wallet)
}

pub async fn fetch_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Wallet>, LedgerError> {
    let wallet =
        sqlx::query_as(r#"SELECT * FROM wallets WHERE user_id = ?"#).bind(user_id).fetch_optional(conn).await?;
    Ok(wallet)
}

/// Unconditionally adds `amount` to one balance.
pub async fn credit(
    user_id: i64,
    currency: Currency,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<(), LedgerError> {
    let column = balance_column(currency);
    let query =
        format!("UPDATE wallets SET {column} = {column} + $1, updated_at = CURRENT_TIMESTAMP WHERE user_id = $2");
    let result = sqlx::query(&query).bind(amount).bind(user_id).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(LedgerError::WalletNotFound(user_id));
    }
    Ok(())
}

/// Subtracts `amount` if and only if the balance covers it. Returns whether the debit applied.
/// The balance precondition in the statement keeps the balance from ever going negative.
pub async fn try_debit(
    user_id: i64,
    currency: Currency,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<bool, LedgerError> {
    let column = balance_column(currency);
    let query = format!(
        "UPDATE wallets SET {column} = {column} - $1, updated_at = CURRENT_TIMESTAMP WHERE user_id = $2 AND {column} \
         >= $1"
    );
    let result = sqlx::query(&query).bind(amount).bind(user_id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
