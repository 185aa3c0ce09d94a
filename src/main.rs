use std::sync::Arc;

use token_verdict::{
    chain::RpcChainClient,
    config::{ConfigValidator, Settings},
    create_router,
    handlers::bind_listener,
    utils::init_logging,
    AppError, AppState, VerdictEngine,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be initialized yet
        eprintln!("token-verdict failed to start: {}", e);
        error!(error = %e, "Fatal startup error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load configuration
    let settings = Settings::new()?;
    init_logging(&settings.logging)?;
    ConfigValidator::new().validate(&settings)?;
    info!(chain = ?settings.chain, "Configuration loaded successfully");

    let client = RpcChainClient::new(&settings.chain)?;
    let engine = VerdictEngine::from_chain(Arc::new(client), &settings);
    let app = create_router(AppState::new(engine));

    let listener = bind_listener(&settings).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "Token verdict service listening");
    info!("  POST   /api/scan - Evaluate a token mint");
    info!("  GET    /health   - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down token verdict service");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
