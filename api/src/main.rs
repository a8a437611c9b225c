use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use flow7_api::{api, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let settings = Settings::from_env().context("Invalid configuration")?;

    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    if settings.debug {
        filter = filter.add_directive("sqlx=debug".parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = Arc::new(AppState::new(settings).context("Failed to set up database pool")?);

    tracing::info!(
        project = %state.settings.project_name,
        environment = %state.settings.environment,
        debug = state.settings.debug,
        database = state.db.is_some(),
        "Starting API"
    );

    let app = api::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&state.settings.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", state.settings.bind_address))?;
    tracing::info!("API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
