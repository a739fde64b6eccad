use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::auth::session::current_identity;
use crate::errors::AppError;
use crate::grant::DbPointGrant;
use crate::ledger::hydrate::hydrate;
use crate::ledger::reconcile::persist;
use crate::ledger::state::{check_extra_defs, RollState};
use crate::models::activity::{self, Activity, NewActivity};
use crate::models::checkin_token;

/// Load an activity and check it belongs to the caller's group.
async fn load_scoped(
    pool: &SqlitePool,
    session: &Session,
    id: &str,
) -> Result<Activity, AppError> {
    let identity = current_identity(session)?;
    let act = activity::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    if act.group_id != identity.group_id {
        return Err(AppError::Forbidden);
    }
    Ok(act)
}

pub async fn list(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let identity = current_identity(&session)?;
    let activities = activity::find_by_group(&pool, &identity.group_id).await?;
    Ok(HttpResponse::Ok().json(activities))
}

pub async fn create(
    pool: web::Data<SqlitePool>,
    session: Session,
    form: web::Json<NewActivity>,
) -> Result<HttpResponse, AppError> {
    let identity = current_identity(&session)?;
    let created =
        activity::create(&pool, &identity.group_id, &identity.member_id, &form.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<NewActivity>,
) -> Result<HttpResponse, AppError> {
    let act = load_scoped(&pool, &session, &path).await?;
    let updated = activity::update(&pool, &act.id, &form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let act = load_scoped(&pool, &session, &path).await?;
    activity::delete(&pool, &act.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// Open the roll sheet: hydrate editable state from the ledger.
pub async fn open_roll(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let act = load_scoped(&pool, &session, &path).await?;
    let edit = hydrate(&pool, &act).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "activity": act,
        "state": edit.current,
    })))
}

#[derive(Deserialize)]
pub struct SaveRollForm {
    pub state: RollState,
    #[serde(default)]
    pub diff_only: bool,
}

/// Save the roll sheet. The snapshot side of the edit session is the freshly
/// hydrated ledger state (by definition the last-persisted state), so a
/// diff-only save with an unchanged submission performs no writes.
pub async fn save_roll(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<SaveRollForm>,
) -> Result<HttpResponse, AppError> {
    let act = load_scoped(&pool, &session, &path).await?;
    let form = form.into_inner();
    check_extra_defs(&form.state.extra_defs).map_err(AppError::Validation)?;

    let mut edit = hydrate(&pool, &act).await?;
    edit.current = form.state;

    let granter = DbPointGrant::new(pool.get_ref().clone());
    let changed = persist(&pool, &granter, &act, &mut edit, form.diff_only).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "changed": changed })))
}

#[derive(Deserialize)]
pub struct NewTokenForm {
    pub expires_in_minutes: Option<i64>,
}

/// Mint an opaque check-in token (QR payload) for the activity, scoped to
/// the activity's group.
pub async fn create_checkin_token(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<NewTokenForm>,
) -> Result<HttpResponse, AppError> {
    let act = load_scoped(&pool, &session, &path).await?;

    let expires_at = form
        .expires_in_minutes
        .map(|minutes| (Utc::now() + Duration::minutes(minutes)).to_rfc3339());

    let token = checkin_token::create(
        &pool,
        &act.id,
        Some(&act.group_id),
        expires_at.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "token": token.token,
        "expires_at": token.expires_at,
        "url": format!("/checkin?t={}", token.token),
    })))
}
