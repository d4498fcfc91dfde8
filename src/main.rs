use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use campus_api::auth::TokenService;
use campus_api::config::config;
use campus_api::database::Database;
use campus_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "campus_api=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Initialize configuration (this loads the config singleton)
    let config = config();
    config.validate()?;
    info!("Starting Campus API in {:?} mode", config.environment);
    if campus_api::is_development!() {
        warn!("Development profile active: default secret and database URL may be in use");
    }

    let db = Database::connect(&config.database)?;
    if config.database.run_migrations {
        match db.migrate().await {
            Ok(()) => {}
            Err(e) if e.is_unavailable() => warn!("Skipping migrations, database not ready: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    let tokens = TokenService::from_config(&config.security)?;
    let state = AppState::new(db.clone(), tokens, config.security.enforce_faculty_gate_per_request);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Campus API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
