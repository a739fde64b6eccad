use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Session(String),
    Validation(String),
    /// The point-grant procedure rejected a batch; message is surfaced verbatim.
    Grant(String),
    Forbidden,
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Validation(e) => write!(f, "{e}"),
            AppError::Grant(e) => write!(f, "[award-points] {e}"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": "not found" }))
            }
            AppError::Forbidden => {
                HttpResponse::Forbidden().json(serde_json::json!({ "error": "forbidden" }))
            }
            AppError::Session(e) => {
                HttpResponse::Unauthorized().json(serde_json::json!({ "error": e }))
            }
            AppError::Validation(e) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": e }))
            }
            AppError::Grant(e) => {
                log::error!("point grant failed: {e}");
                HttpResponse::BadGateway()
                    .json(serde_json::json!({ "error": format!("[award-points] {e}") }))
            }
            AppError::Db(e) => {
                log::error!("database error: {e}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "internal server error" }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}
