mod db;
mod error;
mod middleware;
mod notification;
mod routes;
mod state;
mod task;

use db::{create_pool, run_migrations};
use notification::{ExpoPushClient, NotificationDispatcher, ReminderScheduler, ReminderSweep};
use routes::create_router;
use state::{AppState, Config};
use std::{sync::Arc, time::Duration};
use task::{InMemoryTaskStore, TaskRepository, TaskService, TaskStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reminder_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);

    let store: Arc<dyn TaskStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = create_pool(database_url, config.database_max_connections).await?;

            tracing::info!("Running migrations...");
            run_migrations(&db).await?;

            Arc::new(TaskRepository::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, tasks are kept in memory only");
            Arc::new(InMemoryTaskStore::new())
        }
    };

    // Push delivery and the reminder sweep
    let push_client = ExpoPushClient::new(
        &config.expo_push_url,
        config.expo_access_token.clone(),
        Duration::from_secs(config.push_timeout_secs),
    )?;
    let dispatcher = NotificationDispatcher::new(store.clone(), Arc::new(push_client));
    let sweep = Arc::new(ReminderSweep::new(store.clone(), dispatcher));

    let mut scheduler = ReminderScheduler::new(sweep);
    scheduler.start().await?;

    let state = AppState {
        config: config.clone(),
        task_service: TaskService::new(store, config.utc_offset),
    };

    // Create router
    let app = create_router(state);

    let addr = config.addr();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {:?}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {:?}", e);
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

    tracing::info!("Shutdown signal received");
}
