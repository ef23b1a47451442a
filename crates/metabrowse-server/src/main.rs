//! metabrowse server
//!
//! Web front-end for browsing Salesforce org metadata.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metabrowse_server::{config::AppConfig, create_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "metabrowse_server=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing or malformed configuration is the only fatal fault.
    let config = AppConfig::from_env()?;

    let state = AppState::new(&config);
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting metabrowse server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
