use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTransaction, Transaction, TransactionStatus},
    traits::LedgerError,
};

/// Persists a new transaction in `Pending` state.
pub async fn insert_pending(tx: NewTransaction, conn: &mut SqliteConnection) -> Result<Transaction, LedgerError> {
    let row = sqlx::query_as(
        r#"
            INSERT INTO transactions (user_id, kind, amount, currency, status, note)
            VALUES ($1, $2, $3, $4, 'Pending', $5) RETURNING *;
        "#,
    )
    .bind(tx.user_id)
    .bind(tx.kind)
    .bind(tx.amount)
    .bind(tx.currency)
    .bind(tx.note)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Writes a transaction that is settled at creation time (the send/receive/swap legs).
pub async fn insert_completed(tx: NewTransaction, conn: &mut SqliteConnection) -> Result<Transaction, LedgerError> {
    let row = sqlx::query_as(
        r#"
            INSERT INTO transactions (user_id, kind, amount, currency, status, note)
            VALUES ($1, $2, $3, $4, 'Completed', $5) RETURNING *;
        "#,
    )
    .bind(tx.user_id)
    .bind(tx.kind)
    .bind(tx.amount)
    .bind(tx.currency)
    .bind(tx.note)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Records the provider reference and moves the row `Pending → Submitted`. The status guard makes
/// the transition single-shot.
pub async fn attach_reference(
    id: i64,
    reference_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, LedgerError> {
    let row = sqlx::query_as(
        r#"
            UPDATE transactions SET status = 'Submitted', reference_id = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status = 'Pending' RETURNING *;
        "#,
    )
    .bind(reference_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// The guarded terminal write. Only applies while the row is still pre-terminal, so a duplicate
/// or racing settlement observes `None` and mutates nothing.
pub async fn terminalize(
    id: i64,
    status: TransactionStatus,
    provider_status: Option<&str>,
    provider_reason: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, LedgerError> {
    let row = sqlx::query_as(
        r#"
            UPDATE transactions
            SET status = $1, provider_status = $2, provider_reason = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4 AND status IN ('Pending', 'Submitted') RETURNING *;
        "#,
    )
    .bind(status)
    .bind(provider_status)
    .bind(provider_reason)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Downgrades a row the current settlement has already won to `Failed`. Used when the confirmed
/// ledger delta cannot be applied.
pub async fn record_settlement_failure(
    id: i64,
    reason: &str,
    conn: &mut SqliteConnection,
) -> Result<Transaction, LedgerError> {
    let row = sqlx::query_as(
        r#"
            UPDATE transactions SET status = 'Failed', provider_reason = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 RETURNING *;
        "#,
    )
    .bind(reason)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or(LedgerError::TransactionNotFound(id))?;
    Ok(row)
}

pub async fn fetch_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Transaction>, LedgerError> {
    let row = sqlx::query_as(r#"SELECT * FROM transactions WHERE id = ?"#).bind(id).fetch_optional(conn).await?;
    Ok(row)
}

pub async fn fetch_submitted(conn: &mut SqliteConnection) -> Result<Vec<Transaction>, LedgerError> {
    let rows = sqlx::query_as(
        r#"SELECT * FROM transactions WHERE status = 'Submitted' AND reference_id IS NOT NULL ORDER BY created_at"#,
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn history_for_user(
    user_id: i64,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Transaction>, LedgerError> {
    let rows = sqlx::query_as(
        r#"SELECT * FROM transactions WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?"#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
