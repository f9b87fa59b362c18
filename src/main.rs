use std::future::IntoFuture;
use std::sync::Arc;
use task_api::{app, connect, ensure_tasks_table, seed_tasks, AppState, Config, PgTaskRepository, SeedOutcome};
use tokio::net::TcpListener;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("task_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(environment = %config.app.environment, database = ?config.database, "starting");

    let pool = connect(&config.database).await?;
    ensure_tasks_table(&pool).await?;
    if config.app.is_development() {
        match seed_tasks(&pool).await {
            Ok(SeedOutcome::Inserted(n)) => tracing::info!(rows = n, "seeded tasks"),
            Ok(SeedOutcome::AlreadyPopulated) => tracing::info!("tasks already seeded"),
            Err(e) => tracing::warn!(error = %e, "seeding tasks failed"),
        }
    }

    let state = AppState::new(pool.clone(), Arc::new(PgTaskRepository::new(pool.clone())));
    let router = app(state, &config);

    let listener = TcpListener::bind((config.api.host.as_str(), config.api.port)).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    let (signalled_tx, mut signalled_rx) = watch::channel(false);
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(true);
    });

    let grace = config.api.graceful_timeout;
    tokio::select! {
        res = server.into_future() => res?,
        _ = async {
            let _ = signalled_rx.wait_for(|signalled| *signalled).await;
            tokio::time::sleep(grace).await;
        } => tracing::warn!(timeout = ?grace, "graceful shutdown timed out"),
    }

    pool.close().await;
    tracing::info!("server stopped");
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
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
