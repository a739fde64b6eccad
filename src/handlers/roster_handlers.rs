use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::auth::session::current_identity;
use crate::errors::AppError;
use crate::models::{member, patrol};

/// Youth roster of the caller's group, for the roll screen.
pub async fn members(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let identity = current_identity(&session)?;
    let members = member::find_youth_by_group(&pool, &identity.group_id).await?;
    Ok(HttpResponse::Ok().json(members))
}

pub async fn patrols(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let identity = current_identity(&session)?;
    let patrols = patrol::find_by_group(&pool, &identity.group_id).await?;
    Ok(HttpResponse::Ok().json(patrols))
}
