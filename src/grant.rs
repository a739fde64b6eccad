//! Point-grant boundary: the only path allowed to create `points` rows.
//!
//! The reconciliation engine accumulates grant requests and submits them as
//! one batch; any error fails the whole save and the message is surfaced to
//! the operator verbatim. Deletions issued before the batch are not rolled
//! back — re-running the full save converges (delete-then-insert semantics).

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// One requested ledger insert. Exactly one of `member_id` / `patrol_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patrol_id: Option<String>,
    pub activity_id: String,
    pub points: i64,
    pub reason: String,
}

impl GrantItem {
    pub fn for_member(member_id: &str, activity_id: &str, points: i64, reason: &str) -> Self {
        GrantItem {
            member_id: Some(member_id.to_string()),
            patrol_id: None,
            activity_id: activity_id.to_string(),
            points,
            reason: reason.to_string(),
        }
    }

    pub fn for_patrol(patrol_id: &str, activity_id: &str, points: i64, reason: &str) -> Self {
        GrantItem {
            member_id: None,
            patrol_id: Some(patrol_id.to_string()),
            activity_id: activity_id.to_string(),
            points,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct GrantError(pub String);

impl fmt::Display for GrantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for GrantError {}

#[allow(async_fn_in_trait)]
pub trait PointGrant {
    async fn grant(&self, items: &[GrantItem]) -> Result<(), GrantError>;
}

/// Store-backed granter. Stands in for the remote award-points procedure;
/// plain inserts, never upserts.
#[derive(Clone)]
pub struct DbPointGrant {
    pool: SqlitePool,
}

impl DbPointGrant {
    pub fn new(pool: SqlitePool) -> Self {
        DbPointGrant { pool }
    }
}

impl PointGrant for DbPointGrant {
    async fn grant(&self, items: &[GrantItem]) -> Result<(), GrantError> {
        for item in items {
            if item.member_id.is_some() == item.patrol_id.is_some() {
                return Err(GrantError(
                    "each item needs exactly one of member_id or patrol_id".to_string(),
                ));
            }
            sqlx::query(
                "INSERT INTO points (id, activity_id, member_id, patrol_id, points, reason, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&item.activity_id)
            .bind(&item.member_id)
            .bind(&item.patrol_id)
            .bind(item.points)
            .bind(&item.reason)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| GrantError(e.to_string()))?;
        }
        Ok(())
    }
}
