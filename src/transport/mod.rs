//! SMS transports
//!
//! A transport delivers exactly one message per call and never propagates an
//! error to the caller; every failure is folded into a [`DeliveryOutcome`] so
//! the handler can decide between ack and nack.

pub mod hilink;
pub mod ssh;

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, SendMode};
use crate::error::{Error, Result};

/// Result of a single delivery attempt. `success` is false whenever the
/// transport produced any non-empty error text, regardless of exit status or
/// other output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub diagnostic: String,
}

impl DeliveryOutcome {
    pub fn delivered() -> Self {
        Self {
            success: true,
            diagnostic: String::new(),
        }
    }

    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostic: diagnostic.into(),
        }
    }
}

pub trait Transport: Send + Sync {
    /// Deliver one message to the modem. Must not panic and must not block
    /// indefinitely; transports are stateless and open fresh resources per
    /// call.
    fn send(&self, phone_number: &str, text_message: &str) -> DeliveryOutcome;

    fn name(&self) -> &'static str;
}

/// Select the active transport from the configured send mode. Called once at
/// startup; the choice is immutable for the process lifetime.
pub fn select(config: &Config) -> Result<Arc<dyn Transport>> {
    let transport: Arc<dyn Transport> = match config.send_mode {
        SendMode::Hilink => Arc::new(hilink::HilinkTransport::new()),
        SendMode::Ssh => {
            let ssh = config.ssh.clone().ok_or_else(|| {
                Error::Config("SSH settings are missing for the ssh send mode".to_string())
            })?;
            Arc::new(ssh::SshTransport::new(ssh))
        }
    };
    info!("Using {} transport", transport.name());
    Ok(transport)
}
