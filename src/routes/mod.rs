use actix_web::{web, HttpResponse, Responder};

use crate::frontend;
use crate::handlers::{history_handler, redirect_handler, shorten_handler};
use crate::types::{AppState, HealthStatus};

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    // Calculate uptime in seconds
    let uptime = data.start_time.elapsed().as_secs();

    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        db_health: data.db.health_check().await,
        uptime_seconds: uptime,
    };

    // Return the status as JSON
    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/shorten", web::post().to(shorten_handler))
            .route("/history", web::get().to(history_handler)),
    );
    cfg.route("/", web::get().to(frontend::index));
    cfg.route("/health", web::get().to(health_check));
    // The slug catch-all must stay last so it cannot shadow the routes above
    cfg.route("/{slug}", web::get().to(redirect_handler));
}
