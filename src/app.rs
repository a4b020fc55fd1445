use std::sync::Arc;
use std::time::Instant;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use env_logger::Env;
use log::{debug, info};
use serde_json::json;

use crate::{
    config::{Config, Environment},
    db::Database,
    errors::AppError,
    middleware::RequestLogger,
    repositories::LinkRepository,
    retention::RetentionSweeper,
    routes, services,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    // Setup enhanced logging based on configuration
    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    // Log startup information
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // Storage initialization failure is fatal: the server must not start
    // serving requests against an uninitialized store
    let db = Database::connect(&config.db).await?;

    let repository = Arc::new(LinkRepository::new(db.clone()));

    // The retention sweep lives exactly as long as the server: spawned here,
    // stopped after the listener winds down
    let sweeper = RetentionSweeper::spawn(Arc::clone(&repository));

    // Determine if we should enable more verbose logging
    let enable_debug_logging = config.app.environment != Environment::Production;

    // Determine log format based on environment
    let log_format = if enable_debug_logging {
        // Detailed format for development/testing
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\""
    } else {
        // Simple format for production
        "%a \"%r\" %s %b %T"
    };

    // Create clones for the closure
    let app_config = config.clone();
    let app_db = db.clone();
    let app_repository = Arc::clone(&repository);

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                db: app_db.clone(),
                version: app_config.app.version.clone(),
            }))
            // Make the full configuration available to handlers
            .app_data(web::Data::new(app_config.clone()))
            // Malformed JSON bodies come back in the same {error} shape as
            // every other client error
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(json!({ "error": "invalid JSON body" })),
                )
                .into()
            }))
            .wrap(Cors::permissive())
            .wrap(Logger::new(log_format))
            .wrap(RequestLogger::new(enable_debug_logging))
            .configure(|cfg| services::register(Arc::clone(&app_repository), cfg))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    // Wind down background work before closing the store
    sweeper.shutdown().await;
    db.shutdown().await;

    Ok(())
}
