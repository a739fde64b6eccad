use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::AppError;

/// A scheduled group event against which presence and points are recorded.
///
/// The title participates in reason-tag encoding (see `ledger::reason`), so
/// renaming an activity orphans previously encoded extra/bonus tags.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub kind: String,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub title: String,
    pub starts_at: String,
    pub ends_at: Option<String>,
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "interna".to_string()
}

pub async fn find_by_group(pool: &SqlitePool, group_id: &str) -> Result<Vec<Activity>, AppError> {
    let rows = sqlx::query_as::<_, Activity>(
        "SELECT id, group_id, title, starts_at, ends_at, kind, created_by \
         FROM activities WHERE group_id = ? ORDER BY starts_at DESC, title ASC",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Activity>, AppError> {
    let row = sqlx::query_as::<_, Activity>(
        "SELECT id, group_id, title, starts_at, ends_at, kind, created_by \
         FROM activities WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    group_id: &str,
    created_by: &str,
    new: &NewActivity,
) -> Result<Activity, AppError> {
    if new.title.trim().is_empty() || new.starts_at.trim().is_empty() {
        return Err(AppError::Validation("title and start date are required".into()));
    }
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO activities (id, group_id, title, starts_at, ends_at, kind, created_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(group_id)
    .bind(new.title.trim())
    .bind(&new.starts_at)
    .bind(&new.ends_at)
    .bind(&new.kind)
    .bind(created_by)
    .execute(pool)
    .await?;
    find_by_id(pool, &id).await?.ok_or(AppError::NotFound)
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    new: &NewActivity,
) -> Result<Activity, AppError> {
    if new.title.trim().is_empty() || new.starts_at.trim().is_empty() {
        return Err(AppError::Validation("title and start date are required".into()));
    }
    sqlx::query(
        "UPDATE activities SET title = ?, starts_at = ?, ends_at = ?, kind = ? WHERE id = ?",
    )
    .bind(new.title.trim())
    .bind(&new.starts_at)
    .bind(&new.ends_at)
    .bind(&new.kind)
    .bind(id)
    .execute(pool)
    .await?;
    find_by_id(pool, id).await?.ok_or(AppError::NotFound)
}

/// Delete an activity together with its attendance and point rows.
/// Same deletion order as the upstream client: children first.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM attendance WHERE activity_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM points WHERE activity_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM checkin_tokens WHERE activity_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
