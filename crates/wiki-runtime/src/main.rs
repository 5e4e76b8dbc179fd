//! # Wiki Runtime
//!
//! Replays an interaction log against the contracts of a genesis file and
//! prints the final states.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from the environment
//! 3. Build every genesis contract
//! 4. Replay the interaction log, if one is configured
//! 5. Print `{"summary": ..., "states": ...}` to stdout

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use wiki_runtime::{ContractHost, GenesisFile, InteractionRecord, ReplaySummary, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RuntimeConfig::from_env().context("loading runtime configuration")?;
    info!(genesis = %config.genesis_path.display(), "starting wiki runtime");

    let genesis = GenesisFile::load(&config.genesis_path)
        .with_context(|| format!("loading genesis from {}", config.genesis_path.display()))?;
    let mut host = ContractHost::from_genesis(genesis, &config).context("building genesis states")?;

    let summary = match &config.interactions_path {
        Some(path) => {
            let records = InteractionRecord::load_log(path)
                .with_context(|| format!("loading interactions from {}", path.display()))?;
            info!(records = records.len(), "replaying interactions");
            host.replay(&records).await.context("replaying interactions")?
        }
        None => ReplaySummary {
            digests: host.digests()?,
            ..ReplaySummary::default()
        },
    };

    let output = serde_json::json!({
        "summary": summary,
        "states": host.store().snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
