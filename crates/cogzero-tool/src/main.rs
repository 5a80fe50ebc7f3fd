//! CogZero Service Binary
//!
//! Reads one JSON command per stdin line and writes one JSON response per
//! stdout line. Logs go to stderr.

use anyhow::Result;
use prometheus::Registry;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cogzero_common::VERSION;
use cogzero_tool::{CogZeroConfig, CogZeroService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting CogZero v{}", VERSION);

    // Load configuration
    let config = CogZeroConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let service = CogZeroService::with_registry(&config, Registry::new())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Accepting commands on stdin");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }

                let reply = service.respond(&line);
                let mut out = serde_json::to_vec(&reply)?;
                out.push(b'\n');
                stdout.write_all(&out).await?;
                stdout.flush().await?;
            }
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    info!("Shutting down CogZero service");
    Ok(())
}
