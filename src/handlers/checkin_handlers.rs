use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::auth::session::current_identity;
use crate::checkin::{self, CheckinStatus};
use crate::errors::AppError;
use crate::grant::DbPointGrant;

#[derive(Deserialize)]
pub struct CheckinQuery {
    pub t: Option<String>,
    pub a: Option<String>,
}

fn message(status: CheckinStatus) -> &'static str {
    match status {
        CheckinStatus::Ok => "Presença confirmada! ✔",
        CheckinStatus::Already => "Você já confirmou presença nesta atividade.",
        CheckinStatus::Invalid => "Link inválido.",
        CheckinStatus::Expired => "Este QR/Link expirou.",
        CheckinStatus::Forbidden => "Este check-in não pertence ao seu grupo.",
    }
}

/// Self-service check-in. Every terminal state of the machine maps to a 200
/// with a status field; only the store-write failure surfaces as `error`.
pub async fn checkin(
    pool: web::Data<SqlitePool>,
    session: Session,
    query: web::Query<CheckinQuery>,
) -> Result<HttpResponse, AppError> {
    let identity = current_identity(&session)?;

    // Raw activity-id payloads also get a best-effort presence point, the
    // same side step the upstream QR scanner performed.
    if let Some(a) = query.a.as_deref().filter(|a| !a.trim().is_empty()) {
        let granter = DbPointGrant::new(pool.get_ref().clone());
        if let Err(e) = checkin::ensure_presence_points(&pool, &granter, &identity, a.trim()).await
        {
            log::warn!("best-effort presence points failed: {e}");
        }
    }

    let result = checkin::redeem(
        &pool,
        &identity,
        query.t.as_deref(),
        query.a.as_deref(),
        Utc::now(),
    )
    .await;

    match result {
        Ok(status) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": status,
            "message": message(status),
        }))),
        Err(AppError::Db(e)) => {
            log::error!("check-in write failed: {e}");
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "status": "error",
                "message": "Não foi possível registrar sua presença.",
            })))
        }
        Err(e) => Err(e),
    }
}
