//! Runnable chat relay server.
//!
//! Usage: `chatrelay-server [addr]` — listens on `addr` (default
//! `0.0.0.0:4000`) and relays until killed. Log verbosity follows
//! `RUST_LOG`.

use chatrelay::ChatServerBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:4000".to_string());

    let server = ChatServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(addr = %server.local_addr()?, "chat relay listening");
    server.run().await?;
    Ok(())
}
