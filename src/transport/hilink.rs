//! Local HiLink transport
//!
//! Sends through a local command-line program, passing the destination and
//! the text as discrete arguments so the message body never meets a shell.

use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use super::{DeliveryOutcome, Transport};
use crate::config::HILINK_PROGRAM;

pub struct HilinkTransport {
    program: PathBuf,
}

impl HilinkTransport {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(HILINK_PROGRAM),
        }
    }

    /// Point the transport at a different executable (used by tests).
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for HilinkTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HilinkTransport {
    fn send(&self, phone_number: &str, text_message: &str) -> DeliveryOutcome {
        let output = match Command::new(&self.program)
            .arg(phone_number)
            .arg(text_message)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return DeliveryOutcome::failure(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let diagnostic = if stderr.trim().is_empty() {
                format!("{} exited with {}", self.program.display(), output.status)
            } else {
                stderr.trim().to_string()
            };
            return DeliveryOutcome::failure(diagnostic);
        }

        // A clean exit still fails when anything was written to stderr.
        if !stderr.is_empty() {
            return DeliveryOutcome::failure(stderr.trim().to_string());
        }

        if !stdout.is_empty() {
            info!("Command output: {}", stdout.trim());
        }
        DeliveryOutcome::delivered()
    }

    fn name(&self) -> &'static str {
        "hilink"
    }
}
