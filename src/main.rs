//! smsgate daemon
//!
//! Bridges a Pub/Sub subscription to an SMS-capable modem, one message at a
//! time. `run` starts the consumption loop; `check-config` validates the
//! environment and exits.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use smsgate::config::{Config, SEND_COOLDOWN};
use smsgate::gate::DeliveryGate;
use smsgate::handler::DeliveryHandler;
use smsgate::queue::{DeliveryPipeline, Subscriber};
use smsgate::transport;
use smsgate::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// SMS gateway - deliver queued messages through an SSH or HiLink modem
#[derive(Parser)]
#[command(name = "smsgate")]
#[command(about = "Deliver Pub/Sub messages to a GSM modem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway
    Run,

    /// Validate the environment configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run => cmd_run().await,
        Commands::CheckConfig => cmd_check_config(),
    }
}

fn cmd_check_config() -> Result<()> {
    let config = Config::from_env()?;
    println!(
        "Configuration OK (send mode: {:?}, char limit: {})",
        config.send_mode, config.char_limit
    );
    Ok(())
}

async fn cmd_run() -> Result<()> {
    let config = Config::from_env()?;
    info!("SMS gateway starting");

    let transport = transport::select(&config)?;
    let handler = DeliveryHandler::new(transport, config.char_limit);
    let gate = DeliveryGate::new(SEND_COOLDOWN);
    let pipeline = Arc::new(DeliveryPipeline::new(gate, handler));

    let subscriber = Subscriber::connect(&config).await?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted by user. Shutting down...");
                cancel.cancel();
            }
        });
    }

    // Blocks until cancellation or a subscription-layer failure. The
    // in-flight delivery finishes its ack/nack before this returns; retry
    // after a crash is left to process supervision and queue redelivery.
    let result = subscriber.listen(pipeline, cancel).await;
    if let Err(e) = &result {
        error!("An error occurred while listening for messages: {}", e);
    }
    info!("SMS gateway stopped");
    result
}
