use rand::Rng;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::errors::AppError;

/// A short-lived credential letting a member self-report presence.
/// Owned by the store; the redemption machine only reads it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CheckinToken {
    pub token: String,
    pub activity_id: String,
    pub group_id: Option<String>,
    /// RFC 3339 timestamp; an unparseable value is treated as no expiry.
    pub expires_at: Option<String>,
}

pub async fn find_by_token(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<CheckinToken>, AppError> {
    let row = sqlx::query_as::<_, CheckinToken>(
        "SELECT token, activity_id, group_id, expires_at FROM checkin_tokens WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    activity_id: &str,
    group_id: Option<&str>,
    expires_at: Option<&str>,
) -> Result<CheckinToken, AppError> {
    let token = generate_token();
    sqlx::query(
        "INSERT INTO checkin_tokens (token, activity_id, group_id, expires_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(activity_id)
    .bind(group_id)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(CheckinToken {
        token,
        activity_id: activity_id.to_string(),
        group_id: group_id.map(String::from),
        expires_at: expires_at.map(String::from),
    })
}

/// Random 16-byte hex token; opaque and URL-safe.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}
