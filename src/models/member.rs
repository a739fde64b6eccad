use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: String,
    pub group_id: String,
    pub display_name: String,
    pub role: String,
    pub patrol_id: Option<String>,
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Member>, AppError> {
    let row = sqlx::query_as::<_, Member>(
        "SELECT id, group_id, display_name, role, patrol_id FROM members WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Roster for the roll screen: youth members of the group, by name.
pub async fn find_youth_by_group(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<Vec<Member>, AppError> {
    let rows = sqlx::query_as::<_, Member>(
        "SELECT id, group_id, display_name, role, patrol_id \
         FROM members WHERE group_id = ? AND role <> 'chefe' \
         ORDER BY display_name ASC",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    group_id: &str,
    display_name: &str,
    role: &str,
    patrol_id: Option<&str>,
) -> Result<Member, AppError> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO members (id, group_id, display_name, role, patrol_id) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(group_id)
    .bind(display_name)
    .bind(role)
    .bind(patrol_id)
    .execute(pool)
    .await?;
    find_by_id(pool, &id).await?.ok_or(AppError::NotFound)
}
