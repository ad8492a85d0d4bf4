pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use tracing::{error, info};

use crate::commands::AppState;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::plan_dispatcher::PlanDispatcher;

pub async fn run() {
    if let Err(err) = try_run().await {
        error!(target: "app::startup", error = %err, "server terminated");
        eprintln!("failed to launch server: {err}");
    }
}

async fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    crate::utils::logger::init_logging(&config.log_dir)?;

    let pool = DbPool::new(config.db_path.clone())?;
    let dispatcher = PlanDispatcher::from_config(&config.ai, config.dispatcher)?;
    info!(
        target: "app::startup",
        ai_enabled = dispatcher.has_provider(),
        db = %pool.path().display(),
        "planner ready"
    );

    let app = crate::commands::router(AppState::new(pool, dispatcher));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(target: "app::startup", %addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
