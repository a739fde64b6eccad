use serde::Serialize;
use sqlx::SqlitePool;

use crate::errors::AppError;

/// One ledger row. Exactly one of `member_id` / `patrol_id` is set; the
/// `reason` text is the only carrier of the entry's semantic category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PointEntry {
    pub id: String,
    pub activity_id: String,
    pub member_id: Option<String>,
    pub patrol_id: Option<String>,
    pub points: i64,
    pub reason: String,
    pub created_at: String,
}

pub async fn find_by_activity(
    pool: &SqlitePool,
    activity_id: &str,
) -> Result<Vec<PointEntry>, AppError> {
    let rows = sqlx::query_as::<_, PointEntry>(
        "SELECT id, activity_id, member_id, patrol_id, points, reason, created_at \
         FROM points WHERE activity_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(activity_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Delete every entry for the activity carrying an exact reason string.
pub async fn delete_by_reason(
    pool: &SqlitePool,
    activity_id: &str,
    reason: &str,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM points WHERE activity_id = ? AND reason = ?")
        .bind(activity_id)
        .bind(reason)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a single patrol's entries for the activity carrying an exact reason.
pub async fn delete_by_reason_and_patrol(
    pool: &SqlitePool,
    activity_id: &str,
    reason: &str,
    patrol_id: &str,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM points WHERE activity_id = ? AND reason = ? AND patrol_id = ?")
        .bind(activity_id)
        .bind(reason)
        .bind(patrol_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Whether a member already holds an entry with this exact reason.
pub async fn exists_for_member_reason(
    pool: &SqlitePool,
    activity_id: &str,
    member_id: &str,
    reason: &str,
) -> Result<bool, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM points WHERE activity_id = ? AND member_id = ? AND reason = ?",
    )
    .bind(activity_id)
    .bind(member_id)
    .bind(reason)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}
