//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::io;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        io::Error::other(e)
    })?;

    let state = AppState::init(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application state");
        io::Error::other(e)
    })?;

    tracing::info!(
        "Starting blog API server on {}:{}",
        config.host,
        config.port
    );

    let state = web::Data::new(state);

    // SIGINT/SIGTERM stop accepting connections and drain in-flight requests.
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(state.clone())
            .configure(handlers::configure_routes)
    })
    .keep_alive(config.keep_alive)
    .client_request_timeout(config.client_request_timeout)
    .shutdown_timeout(config.shutdown_timeout_secs)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
