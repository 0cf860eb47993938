//! Taskboard server.
//!
//! Serves the identity webhook and runs the backlog promotion job against
//! `PostgreSQL`. The schema under `migrations/` must already be applied.

use anyhow::{Context, Result};
use diesel::{
    PgConnection,
    r2d2::{ConnectionManager, Pool},
};
use mockable::DefaultClock;
use secrecy::ExposeSecret;
use std::sync::Arc;
use taskboard::{
    api,
    settings::Settings,
    task::{
        adapters::postgres::PostgresTaskRepository,
        services::{BacklogJob, TaskLifecycleService},
    },
    telemetry,
    user::{adapters::postgres::PostgresUserRepository, services::UserDirectoryService},
};
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    telemetry::init(&settings.telemetry).context("failed to initialise logging")?;

    let manager = ConnectionManager::<PgConnection>::new(settings.database.url.expose_secret());
    let pool = Pool::builder()
        .max_size(settings.database.pool_size)
        .build(manager)
        .context("failed to build database pool")?;
    let clock = Arc::new(DefaultClock);

    let tasks = Arc::new(TaskLifecycleService::new(
        Arc::new(PostgresTaskRepository::new(pool.clone())),
        Arc::clone(&clock),
    ));
    let directory = Arc::new(UserDirectoryService::new(
        Arc::new(PostgresUserRepository::new(pool)),
        clock,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let backlog = tokio::spawn(BacklogJob::new(tasks, settings.backlog.interval()).run(shutdown_rx));

    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "taskboard listening");

    axum::serve(listener, api::router(directory))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    if shutdown_tx.send(true).is_err() {
        warn!("backlog job already stopped");
    }
    backlog.await.context("backlog job panicked")?;
    info!("taskboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
