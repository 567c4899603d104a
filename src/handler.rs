//! Per-message delivery logic
//!
//! Decode, validate, truncate, dispatch, and decide ack vs nack. Malformed
//! payloads are acknowledged and dropped: they will never become valid on
//! redelivery, and nacking them would loop forever. Requests with a missing
//! or empty field are nacked instead; that asymmetry is kept from the
//! original behavior and is flagged for product review, not unified here.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::transport::Transport;
use crate::truncate::truncate;

/// What to do with the queue message once handling finished. The caller
/// applies it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ack,
    Nack,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct SmsRequest {
    pub phone_number: String,
    pub text_message: String,
}

enum Decoded {
    Request(SmsRequest),
    /// Not UTF-8 JSON carrying an object. Terminal.
    Malformed(serde_json::Error),
    /// A JSON object, but without two non-empty string fields. Retryable.
    Incomplete(String),
}

fn decode_request(payload: &[u8]) -> Decoded {
    let object: Map<String, Value> = match serde_json::from_slice(payload) {
        Ok(object) => object,
        Err(e) => return Decoded::Malformed(e),
    };
    let request: SmsRequest = match serde_json::from_value(Value::Object(object)) {
        Ok(request) => request,
        Err(e) => return Decoded::Incomplete(e.to_string()),
    };
    if request.phone_number.is_empty() {
        return Decoded::Incomplete("phone_number is empty".to_string());
    }
    if request.text_message.is_empty() {
        return Decoded::Incomplete("text_message is empty".to_string());
    }
    Decoded::Request(request)
}

pub struct DeliveryHandler {
    transport: Arc<dyn Transport>,
    char_limit: usize,
}

impl DeliveryHandler {
    pub fn new(transport: Arc<dyn Transport>, char_limit: usize) -> Self {
        Self {
            transport,
            char_limit,
        }
    }

    /// Decide the fate of one raw payload. Never fails; every error maps
    /// onto a disposition.
    pub async fn handle(&self, payload: &[u8]) -> Disposition {
        let request = match decode_request(payload) {
            Decoded::Request(request) => request,
            Decoded::Malformed(e) => {
                warn!("JSON decoding error: {}. Dropping the message.", e);
                return Disposition::Ack;
            }
            Decoded::Incomplete(reason) => {
                warn!(
                    "Message is missing phone number or text message ({}). Nack-ing the message.",
                    reason
                );
                return Disposition::Nack;
            }
        };

        info!("Received message for phone number: {}", request.phone_number);
        let text = truncate(&request.text_message, self.char_limit);

        // The transport blocks (SSH connect or child process); keep it off
        // the async workers.
        let transport = Arc::clone(&self.transport);
        let phone_number = request.phone_number.clone();
        let sent = tokio::task::spawn_blocking(move || transport.send(&phone_number, &text)).await;

        let outcome = match sent {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error in delivery task: {}. Nack-ing the message.", e);
                return Disposition::Nack;
            }
        };

        if outcome.success {
            Disposition::Ack
        } else {
            error!(
                "Failed to process message for phone number: {}. Nack-ing the message. ({})",
                request.phone_number, outcome.diagnostic
            );
            Disposition::Nack
        }
    }
}
