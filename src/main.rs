//! Vault Auto-Redeemer
//!
//! Watches an ERC-4626-style vault on behalf of an operator account and
//! redeems its shares the moment they become redeemable.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI (this file)
//!     │  config file + flags + REDEEMER_PRIVATE_KEY
//!     ▼
//!   SessionController ──start/stop──▶ RedemptionMachine (one tokio task)
//!     │                                   │  every interval_ms
//!     │                                   ▼
//!     │                               VaultAccessor ──▶ balanceOf / maxRedeem
//!     │                                   │              redeem / receipt
//!     ▼                                   ▼
//!   StatusBoard ◀──── state + activity log ────┘
//!     │
//!     └──▶ stdout (log entries), tracing, metrics
//! ```

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use vault_redeemer::activity::LogEntry;
use vault_redeemer::config::{
    load_config, signing_key_from_env, validate_config, ConfigError, RedeemerConfig,
};
use vault_redeemer::lifecycle::signals;
use vault_redeemer::observability;
use vault_redeemer::session::{AlloyConnector, Connector, SessionConfig, SessionController};
use vault_redeemer::vault::read_position;

#[derive(Parser)]
#[command(name = "vault-redeemer", version)]
#[command(about = "Redeem vault shares as soon as they become redeemable", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Command-line values that take precedence over the config file.
#[derive(Args)]
struct Overrides {
    /// JSON-RPC endpoint URL
    #[arg(long, env = "REDEEMER_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Vault contract address
    #[arg(long, global = true)]
    vault: Option<String>,

    /// Address credited with the redeemed assets
    #[arg(long, global = true)]
    receiver: Option<String>,

    /// Milliseconds between cycles
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,
}

impl Overrides {
    fn apply(self, config: &mut RedeemerConfig) {
        if let Some(rpc_url) = self.rpc_url {
            config.session.rpc_url = rpc_url;
        }
        if let Some(vault) = self.vault {
            config.session.vault = vault;
        }
        if let Some(receiver) = self.receiver {
            config.session.receiver = receiver;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.polling.interval_ms = interval_ms;
            config.polling.error_backoff_max_ms =
                config.polling.error_backoff_max_ms.max(interval_ms);
        }
        if self.json_logs {
            config.observability.log_format = vault_redeemer::config::LogFormat::Json;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the vault and redeem once shares become redeemable
    Run,
    /// Read balance and redeemable shares once, without submitting anything
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RedeemerConfig::default(),
    };
    cli.overrides.apply(&mut config);

    observability::logging::init(&config.observability);
    tracing::info!("vault-redeemer v{} starting", env!("CARGO_PKG_VERSION"));

    validate_config(&config).map_err(ConfigError::Validation)?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let signing_key = signing_key_from_env()?;
    let session = SessionConfig::from_settings(&config.session, signing_key)
        .map_err(ConfigError::Validation)?;

    match cli.command {
        Commands::Run => run(&config, session).await,
        Commands::Check => check(&config, session).await,
    }
}

async fn run(
    config: &RedeemerConfig,
    session: SessionConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let connector = Arc::new(AlloyConnector::new(config.blockchain.clone()));
    let mut controller = SessionController::new(connector, config.polling.clone());
    let mut entries = controller.subscribe_log();
    let mut state = controller.subscribe_state();

    controller.configure(session);
    controller.start().await?;

    let terminate = signals::wait_for_termination();
    tokio::pin!(terminate);

    loop {
        tokio::select! {
            received = entries.recv() => match received {
                Ok(entry) => print_entry(&entry),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Log output fell behind");
                }
                Err(RecvError::Closed) => break,
            },
            changed = state.changed() => {
                if changed.is_err() || !state.borrow().state.running {
                    break;
                }
            }
            _ = &mut terminate => {
                controller.stop();
                break;
            }
        }
    }

    controller.stop();
    // Let an in-flight cycle reach its receipt before reporting.
    controller.wait().await;
    loop {
        match entries.try_recv() {
            Ok(entry) => print_entry(&entry),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    let snapshot = controller.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot.state)?);
    Ok(())
}

async fn check(
    config: &RedeemerConfig,
    session: SessionConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let connection = AlloyConnector::new(config.blockchain.clone()).connect(&session)?;
    let position = read_position(connection.accessor.as_ref(), session.vault, connection.operator)
        .await?;

    let report = json!({
        "vault": session.vault,
        "operator": connection.operator,
        "balance": position.balance.to_string(),
        "max_redeemable": position.max_redeemable.to_string(),
        "redeemable_now": position.redeemable().to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_entry(entry: &LogEntry) {
    println!("{}", entry);
}
