// Main entry point for the social graph service

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use social_graph_core::common::auth::JwtService;
use social_graph_core::domains::registration::{run_register_listener, RegisterUserHandler};
use social_graph_core::kernel::{
    HttpFeedNotifier, NatsClientPublisher, PostgresGraphStore, ServerDeps,
};
use social_graph_core::server::{build_app, HttpOptions};
use social_graph_core::Config;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,social_graph_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting social graph service");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    tracing::info!("Connecting to database...");
    let store = PostgresGraphStore::connect(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Running database migrations...");
    store.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    tracing::info!(url = %config.nats_url, "Connecting to NATS...");
    let nats = async_nats::connect(config.nats_url.as_str())
        .await
        .context("Failed to connect to NATS")?;

    let feed_notifier = HttpFeedNotifier::new(&config.feed_service_url, config.feed_timeout)
        .context("Failed to build feed service client")?;

    let server_deps = ServerDeps::new(
        Arc::new(store),
        Arc::new(feed_notifier),
        Arc::new(NatsClientPublisher::new(nats.clone())),
    )
    .with_two_hop_limit(config.recommendation_two_hop_limit);

    // Saga participant runs until the HTTP server has shut down
    let handler =
        RegisterUserHandler::new(server_deps.clone()).with_timeout(config.saga_handler_timeout);
    let listener_shutdown = CancellationToken::new();
    let shutdown = listener_shutdown.clone();
    let listener_nats = nats.clone();
    let listener_task = tokio::spawn(async move {
        if let Err(e) = run_register_listener(listener_nats, handler, shutdown).await {
            tracing::error!(error = %e, "Register listener exited with error");
        }
    });

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let app = build_app(
        server_deps,
        jwt_service,
        HttpOptions {
            allowed_origins: config.allowed_origins.clone(),
            request_timeout: config.request_timeout,
        },
    );

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");

    listener_shutdown.cancel();
    let drain_deadline = config.saga_handler_timeout + Duration::from_secs(1);
    if tokio::time::timeout(drain_deadline, listener_task).await.is_err() {
        tracing::warn!("Register listener did not drain in time");
    }
    if let Err(e) = nats.flush().await {
        tracing::warn!(error = %e, "Failed to flush NATS before exit");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("received shutdown signal");
}
