//! # NutriVision API Server
//!
//! Accounts, diet profiles and token sessions, plus authenticated proxies
//! to the LLM chat and image-recognition services.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::auth::TokenGate;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting NutriVision API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;

    #[cfg(feature = "scheduler")]
    let _scheduler = start_scheduler(&state).await;

    HttpServer::new(move || {
        let limiter = state.login_limiter.clone();
        App::new()
            .wrap(TokenGate::new(state.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| handlers::configure_routes(cfg, limiter))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Start the blacklist sweep. A scheduler failure is logged, not fatal.
#[cfg(feature = "scheduler")]
async fn start_scheduler(state: &AppState) -> Option<background::Scheduler> {
    let scheduler = match background::Scheduler::new().await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create scheduler");
            return None;
        }
    };

    let cron = &state.settings.blacklist_purge_cron;
    if let Err(e) = scheduler
        .add_blacklist_sweep(cron, state.blacklist.clone())
        .await
    {
        tracing::error!(error = %e, schedule = %cron, "Invalid blacklist sweep schedule");
        return None;
    }

    if let Err(e) = scheduler.start().await {
        tracing::error!(error = %e, "Failed to start scheduler");
        return None;
    }

    Some(scheduler)
}
