//! Serve command - runs the chainpad HTTP API.

use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};

use chainpad::{
    Aggregator, SystemClock,
    server::{AppState, router},
    store::{InMemoryStore, Store},
};

use crate::cli::ServeArgs;

pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.upstream.to_config()?;
    if config.etherscan_api_key.is_none() {
        tracing::warn!("ETHERSCAN_API_KEY is not set; block lookups use anonymous rate-limited access");
    }
    if config.coingecko_api_key.is_none() {
        tracing::info!("COINGECKO_API_KEY is not set; price lookups are unauthenticated");
    }

    let aggregator = Aggregator::from_config(&config)?;
    let store: Arc<dyn Store> = if args.demo_data {
        tracing::info!("Seeding store with demo data");
        Arc::new(InMemoryStore::with_demo_data()?)
    } else {
        Arc::new(InMemoryStore::new())
    };
    let app = router(AppState::new(aggregator, store, Arc::new(SystemClock)));

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        %local_addr,
        etherscan = %config.etherscan_url,
        coingecko = %config.coingecko_url,
        fiat = %config.fiat,
        "Chainpad server started"
    );
    println!("Chainpad server listening on http://localhost:{}", local_addr.port());
    println!();
    println!("Available endpoints:");
    println!("  GET    /health                     - Health check");
    println!("  GET    /api/whoami                 - Caller principal");
    println!("  POST   /api/auth/login             - Log in");
    println!("  POST   /api/auth/register          - Register a user");
    println!("  GET    /api/files?userId=          - List a user's files");
    println!("  POST   /api/files                  - Create a file");
    println!("  GET    /api/files/{{id}}             - Fetch a file");
    println!("  PUT    /api/files/{{id}}             - Update a file");
    println!("  DELETE /api/files/{{id}}             - Delete a file");
    println!("  GET    /api/recent-files?userId=   - Recently opened files");
    println!("  POST   /api/recent-files           - Record an opened file");
    println!("  POST   /api/chat/blockchain        - Block lookup (`block ±N`)");
    println!("  GET    /api/chat/price?currency=   - Price lookup");
    println!("  GET    /api/blockchain/block/{{tag}} - Raw block pass-through");
    println!();
    println!("Press Ctrl+C to shutdown");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
                _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
            }
        })
        .await?;

    println!("Server shut down");
    Ok(())
}
