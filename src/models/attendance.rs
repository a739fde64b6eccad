use sqlx::SqlitePool;

use crate::errors::AppError;

/// Member ids with an attendance row for the activity. Row existence is the
/// sole presence signal; there is no explicit "absent" state.
pub async fn find_member_ids(
    pool: &SqlitePool,
    activity_id: &str,
) -> Result<Vec<String>, AppError> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT member_id FROM attendance WHERE activity_id = ?",
    )
    .bind(activity_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn exists(
    pool: &SqlitePool,
    activity_id: &str,
    member_id: &str,
) -> Result<bool, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE activity_id = ? AND member_id = ?",
    )
    .bind(activity_id)
    .bind(member_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Idempotent presence insert; a duplicate (activity, member) pair is a no-op.
pub async fn insert_present(
    pool: &SqlitePool,
    activity_id: &str,
    member_id: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO attendance (activity_id, member_id) VALUES (?, ?)")
        .bind(activity_id)
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_for_activity(pool: &SqlitePool, activity_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM attendance WHERE activity_id = ?")
        .bind(activity_id)
        .execute(pool)
        .await?;
    Ok(())
}
