pub mod activity_handlers;
pub mod auth_handlers;
pub mod checkin_handlers;
pub mod roster_handlers;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// CSRF protection for the JSON mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type:
/// application/json. Browsers cannot send cross-origin JSON with cookies via
/// simple form POST, so the Content-Type check acts as a CSRF guard without
/// requiring tokens. GET requests are exempt.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Session-protected routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/logout", web::post().to(auth_handlers::logout))
        .route("/members", web::get().to(roster_handlers::members))
        .route("/patrols", web::get().to(roster_handlers::patrols))
        .route("/activities", web::get().to(activity_handlers::list))
        .route("/activities", web::post().to(activity_handlers::create))
        .route("/activities/{id}", web::put().to(activity_handlers::update))
        .route(
            "/activities/{id}",
            web::delete().to(activity_handlers::delete),
        )
        .route(
            "/activities/{id}/roll",
            web::get().to(activity_handlers::open_roll),
        )
        .route(
            "/activities/{id}/roll",
            web::post().to(activity_handlers::save_roll),
        )
        .route(
            "/activities/{id}/checkin-token",
            web::post().to(activity_handlers::create_checkin_token),
        )
        .route("/checkin", web::get().to(checkin_handlers::checkin));
}
