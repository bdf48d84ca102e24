//! LexiAI API server binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lexiai_api::{router, AppState, Args};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let app_level = if args.verbose { "lexiai_api=debug" } else { "lexiai_api=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(app_level.parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing LexiAI API...");
    let state = Arc::new(AppState::new(&args).await?);

    // Per-IP rate limiting
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.burst_size())
            .finish()
            .ok_or_else(|| anyhow!("invalid rate limit: {}", args.rate_limit))?,
    );

    let app = router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("LexiAI API listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
