//! Shared test infrastructure: in-memory SQLite pool plus seed helpers.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use tropa::db::MIGRATIONS;
use tropa::models::activity::{self, Activity};
use tropa::models::member::{self, Member};
use tropa::models::patrol::{self, Patrol};

pub struct TestDb {
    pool: SqlitePool,
}

impl TestDb {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// One shared in-memory connection so every query sees the same database.
pub async fn setup_test_db() -> TestDb {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory test DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb { pool }
}

pub async fn seed_group(pool: &SqlitePool, name: &str) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO groups (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(name)
        .execute(pool)
        .await
        .expect("seed group");
    id
}

pub async fn seed_member(pool: &SqlitePool, group_id: &str, name: &str) -> Member {
    member::create(pool, group_id, name, "escoteiros", None)
        .await
        .expect("seed member")
}

pub async fn seed_patrol(pool: &SqlitePool, group_id: &str, name: &str) -> Patrol {
    patrol::create(pool, group_id, name, "escoteiros")
        .await
        .expect("seed patrol")
}

pub async fn seed_activity(pool: &SqlitePool, group_id: &str, title: &str) -> Activity {
    let new = activity::NewActivity {
        title: title.to_string(),
        starts_at: "2026-08-22".to_string(),
        ends_at: None,
        kind: "interna".to_string(),
    };
    let chief = member::create(pool, group_id, "Chefe", "chefe", None)
        .await
        .expect("seed chief");
    activity::create(pool, group_id, &chief.id, &new)
        .await
        .expect("seed activity")
}

/// Insert a point row directly, bypassing the grant boundary. Tests use this
/// to fabricate pre-existing ledger shapes (legacy rows, duplicates).
pub async fn seed_point(
    pool: &SqlitePool,
    activity_id: &str,
    member_id: Option<&str>,
    patrol_id: Option<&str>,
    points: i64,
    reason: &str,
) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO points (id, activity_id, member_id, patrol_id, points, reason, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(activity_id)
    .bind(member_id)
    .bind(patrol_id)
    .bind(points)
    .bind(reason)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .expect("seed point");
    id
}

/// All point row ids for an activity, sorted. Delete-then-insert rewrites
/// produce fresh ids, so unchanged ids prove no writes happened.
pub async fn point_ids(pool: &SqlitePool, activity_id: &str) -> Vec<String> {
    let mut ids = sqlx::query_scalar::<_, String>(
        "SELECT id FROM points WHERE activity_id = ?",
    )
    .bind(activity_id)
    .fetch_all(pool)
    .await
    .expect("point ids");
    ids.sort();
    ids
}

pub async fn point_total(pool: &SqlitePool, activity_id: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points), 0) FROM points WHERE activity_id = ?",
    )
    .bind(activity_id)
    .fetch_one(pool)
    .await
    .expect("point total")
}
