use sqlx::SqliteConnection;

use crate::{db_types::UserProfile, traits::LedgerError};

pub async fn insert(
    phone_number: &str,
    name: &str,
    language: &str,
    conn: &mut SqliteConnection,
) -> Result<UserProfile, LedgerError> {
    let user = sqlx::query_as(
        r#"
            INSERT INTO users (phone_number, name, language) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(phone_number)
    .bind(name)
    .bind(language)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            LedgerError::PhoneAlreadyRegistered(phone_number.to_string())
        },
        _ => LedgerError::from(e),
    })?;
    Ok(user)
}

pub async fn fetch_by_phone(
    phone_number: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<UserProfile>, LedgerError> {
    let user = sqlx::query_as(r#"SELECT * FROM users WHERE phone_number = ?"#)
        .bind(phone_number)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}
