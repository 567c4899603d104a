//! smsgate - Pub/Sub to GSM modem SMS gateway
//!
//! Consumes `{phone_number, text_message}` messages from a Pub/Sub
//! subscription and delivers them one at a time to a cellular modem, either
//! over SSH (`sms_tool` on a remote router) or through a local HiLink CLI.
//! Failed deliveries are nacked so the queue redelivers them; a fixed
//! cooldown between sends keeps the modem from being flooded.

pub mod config;
pub mod error;
pub mod gate;
pub mod handler;
pub mod queue;
pub mod transport;
pub mod truncate;

pub use error::{Error, Result};
