use car_doctor::{
    build_cors, build_router, AppConfig, AppState, DocumentStore, InMemoryDocumentStore,
    PostgresDocumentStore, TokenService,
};
use std::{error::Error, sync::Arc};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "car_doctor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Car Doctor server stopped with an error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    info!("Starting Car Doctor server");

    let config = AppConfig::from_env()?;

    // One store handle for the whole process, closed after the server drains
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PostgresDocumentStore::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set, using in-memory document store");
            Arc::new(InMemoryDocumentStore::new())
        }
    };
    store.ping().await?;
    info!("Pinged document store successfully");

    let token_service = Arc::new(TokenService::new(config.jwt_secret.clone()));
    let app_state = AppState::new(Arc::clone(&store), token_service, config.port);
    let app = build_router(app_state, build_cors(&config.cors_origins));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, "Server is running on port {}", config.port);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    info!("Car Doctor server shut down");
    served.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
