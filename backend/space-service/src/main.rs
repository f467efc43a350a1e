use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use space_service::clock::{Clock, SystemClock};
use space_service::config::Config;
use space_service::handlers;
use space_service::services::{RatingService, ReportingService};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "space-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "space-service",
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "alive": true }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        env = %config.app.env,
        port = config.app.http_port,
        cooldown_minutes = config.limits.cooldown_minutes,
        daily_limit = config.limits.daily_limit,
        "Starting space-service"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database.url)
        .await?;
    tracing::info!("Database pool initialized");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let reporting = web::Data::new(ReportingService::new(
        pool.clone(),
        config.limits,
        clock.clone(),
    ));
    let ratings = web::Data::new(RatingService::new(pool.clone(), clock));
    let pool_data = web::Data::new(pool);

    let bind_addr = (config.app.host.clone(), config.app.http_port);
    tracing::info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(pool_data.clone())
            .app_data(reporting.clone())
            .app_data(ratings.clone())
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .service(
                        web::resource("/reports")
                            .route(web::post().to(handlers::reports::submit_report)),
                    )
                    .service(
                        web::resource("/spaces/{space_id}/ratings")
                            .route(web::post().to(handlers::ratings::upsert_rating))
                            .route(web::get().to(handlers::ratings::list_space_ratings)),
                    )
                    .service(
                        web::resource("/ratings")
                            .route(web::get().to(handlers::ratings::list_all_ratings)),
                    )
                    .service(
                        web::resource("/ratings/{rating_id}")
                            .route(web::put().to(handlers::ratings::update_rating))
                            .route(web::delete().to(handlers::ratings::delete_rating)),
                    )
                    .service(
                        web::resource("/users/{user_id}/ratings")
                            .route(web::get().to(handlers::ratings::list_user_ratings)),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
