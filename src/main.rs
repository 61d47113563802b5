//! Portfolio backend entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use portfolio_backend::config::AppConfig;
use portfolio_backend::services::{ContactService, SmtpRelay};
use portfolio_backend::state::AppState;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting portfolio backend");

    // Load configuration; exit non-zero if the operator address or
    // credential is unset.
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("Email configuration missing or invalid: {err}");
            return Err(err);
        }
    };

    info!(
        smtp_host = %config.smtp.host,
        smtp_port = config.smtp.port,
        sender = %config.smtp.sender,
        password_set = !config.smtp.password.is_empty(),
        "Configuration loaded"
    );

    let relay = SmtpRelay::new(&config.smtp)?;
    let state = AppState::new(ContactService::new(Arc::new(relay)));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Listening");

    axum::serve(listener, portfolio_backend::router(state)).await?;

    Ok(())
}
