//! Jira metrics exporter.
//!
//! Serves `/metrics`, `/liveness` and `/readiness`. Configuration comes from
//! the environment (or `CONFIG_FILE`); see `config`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jirametrics_core::error::{ExporterError, Result};
use jirametrics_exporter::{app_state::AppState, config, config::RefreshMode, router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(kind = e.kind().as_str(), error = %e, "exporter stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load()?;
    let listen = cfg.exporter.listen_addr()?;
    let period = cfg.exporter.refresh_period()?;
    let mode = cfg.exporter.refresh_mode;

    let state = AppState::new(cfg)?;
    let refresher = state.refresher();
    tracing::info!(
        jql = refresher.jql(),
        ?mode,
        period = %humantime::format_duration(period),
        "jira exporter configured"
    );

    let refresh_task = match mode {
        RefreshMode::Interval => Some(refresher.spawn_interval(period)),
        RefreshMode::Scrape => None,
    };

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(listen).await.map_err(|e| {
        ExporterError::Config(format!("bind {listen} failed: {e}"))
    })?;
    tracing::info!(%listen, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(task) = refresh_task {
        task.abort();
    }
    served.map_err(|e| ExporterError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
