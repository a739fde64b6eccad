use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::auth::session::{store_identity, Identity};
use crate::errors::AppError;
use crate::models::member;

#[derive(Deserialize)]
pub struct LoginForm {
    pub member_id: String,
}

/// Dev-grade login: resolves a member and stores the identity context
/// (member id + group id) in the session. Credential verification belongs to
/// the external identity provider, not this service.
pub async fn login(
    pool: web::Data<SqlitePool>,
    session: Session,
    form: web::Json<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let found = member::find_by_id(&pool, &form.member_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let identity = Identity {
        member_id: found.id.clone(),
        group_id: found.group_id.clone(),
    };
    store_identity(&session, &identity)?;

    Ok(HttpResponse::Ok().json(found))
}

pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}
