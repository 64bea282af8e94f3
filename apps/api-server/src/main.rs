//! # Fleet API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod state;

use background::scheduler::{Scheduler, SchedulerConfig};
use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Fleet API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new();

    // Reconciliation runs outside the request path.
    let scheduler = Scheduler::new(SchedulerConfig::from_env())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    scheduler
        .register_reconciliation(state.reconciler.clone())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    scheduler
        .start()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let token_service = state.tokens.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,api_server=debug,fleet_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
