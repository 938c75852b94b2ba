mod api;
mod config;
mod error;
mod models;
mod paths;
mod repository;
mod seed;
mod services;
mod timeline;

use crate::config::Config;
use crate::repository::{ExecutionRepository, FunctionRepository, establish_connection};
use crate::services::{Clock, ExecutionService, FunctionService, Ticker, TimelineService};
use api::create_router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventos_console=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting eventos_console with config: {:?}", config);

    if let Some(path) = config.database_url.strip_prefix("sqlite:") {
        let path = std::path::Path::new(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_pool = establish_connection(&config.database_url).await?;
    tracing::info!("Database connected: {}", config.database_url);

    let function_repo = FunctionRepository::new(db_pool.clone());
    let execution_repo = ExecutionRepository::new(db_pool);

    let clock = Clock::starting_now();
    if config.seed_demo_data
        && seed::seed_if_empty(&execution_repo, clock.now()).await?
    {
        tracing::info!("Seeded demo functions and executions");
    }

    // Views read the shared clock, so the ticker only has to move it forward.
    let ticker = Ticker::spawn(clock.clone(), config.tick_interval());

    let function_service = FunctionService::new(function_repo.clone());
    let execution_service = ExecutionService::new(execution_repo.clone(), clock.clone());
    let timeline_service = TimelineService::new(execution_repo, function_repo, clock);

    let app = create_router(function_service, execution_service, timeline_service)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let addr = addr.parse::<SocketAddr>()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
            }
        })
        .await?;

    ticker.cancel().await;
    tracing::info!("Server stopped");
    Ok(())
}
