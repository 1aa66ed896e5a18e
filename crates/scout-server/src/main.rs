mod api;
mod middleware;

use std::sync::Arc;

use scout_discovery::{DiscoveryOrchestrator, JobQueue};
use scout_store::{JobStatusStore, RedisStore};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = scout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let auth = AuthState::from_env(matches!(config.env, scout_core::Environment::Development))?;

    let store = JobStatusStore::new(Arc::new(RedisStore::connect(&config.redis_url).await?));
    let orchestrator = Arc::new(DiscoveryOrchestrator::from_config(&config, store.clone())?);
    let (queue, _workers) = JobQueue::start(orchestrator, config.worker_concurrency);
    tracing::info!(
        workers = config.worker_concurrency,
        env = %config.env,
        "discovery workers started"
    );

    let app = build_app(AppState { queue, store }, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    // Running jobs are not cancelled; they end with the runtime.
    tracing::info!("received shutdown signal, starting graceful shutdown");
}
