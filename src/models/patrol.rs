use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Patrol {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub category: String,
}

pub async fn find_by_group(pool: &SqlitePool, group_id: &str) -> Result<Vec<Patrol>, AppError> {
    let rows = sqlx::query_as::<_, Patrol>(
        "SELECT id, group_id, name, category FROM patrols \
         WHERE group_id = ? ORDER BY category ASC, name ASC",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    group_id: &str,
    name: &str,
    category: &str,
) -> Result<Patrol, AppError> {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO patrols (id, group_id, name, category) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(group_id)
        .bind(name)
        .bind(category)
        .execute(pool)
        .await?;
    let row = sqlx::query_as::<_, Patrol>(
        "SELECT id, group_id, name, category FROM patrols WHERE id = ?",
    )
    .bind(&id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
