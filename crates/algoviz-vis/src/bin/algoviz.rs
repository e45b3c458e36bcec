//! Algoviz visualization server
//!
//! Serves the step player and its API. An optional first argument overrides
//! the listen address from `ALGOVIZ_ADDR`.

use std::env;

use algoviz_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoviz=info,algoviz_vis=info,algoviz_trace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = VisConfig::from_env()?;
    if let Some(addr) = env::args().nth(1) {
        config = config.with_addr(&addr)?;
    }

    tracing::info!(
        addr = %config.addr,
        speed_ms = config.speed_ms,
        "Starting algoviz"
    );

    let server = VisServer::new(config)?;
    server.serve().await?;

    Ok(())
}
