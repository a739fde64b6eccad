use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware, web, App, HttpServer};

use tropa::{auth, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/tropa.db".to_string());
    if database_url.starts_with("sqlite://data/") {
        std::fs::create_dir_all("data").expect("Failed to create data directory");
    }

    let pool = db::init_pool(&database_url).await;
    db::run_migrations(&pool).await;

    // Session encryption key — load from SESSION_KEY env var for persistent
    // sessions across restarts.
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .wrap(actix_web::middleware::from_fn(
                handlers::require_json_content_type,
            ))
            .app_data(web::Data::new(pool.clone()))
            // Public routes
            .route(
                "/login",
                web::post().to(handlers::auth_handlers::login),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(
                        auth::middleware::require_auth,
                    ))
                    .configure(handlers::configure),
            )
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "not found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
