//! Sandbox entrypoint.
//!
//! Stdout belongs to the engine protocol; every diagnostic goes to stderr.
//! Fatal errors surface as a nonzero exit; the engine treats sandbox death
//! as submission failure, and there is nothing useful to retry here.

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use reef_bot_core::harness::{BotSession, HarnessConfig};
use reef_bot_core::spawn::EconomyPolicy;
use reef_bot_core::transport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("runner.start v{}", env!("CARGO_PKG_VERSION"));

    let mut session = BotSession::new(Box::new(EconomyPolicy::default()));
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let result = transport::run(&mut session, &HarnessConfig::default(), stdin, stdout).await;
    match &result {
        Ok(()) => tracing::info!("runner.exit clean"),
        Err(err) => tracing::error!("runner.fatal {err:#}"),
    }
    result
}
