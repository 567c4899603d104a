//! Pub/Sub consumption
//!
//! The subscription side of the gateway: a thin wrapper over the Pub/Sub
//! client plus the serialized pipeline that feeds each received message
//! through the gate and the handler, then acks or nacks it exactly once.

use std::future::Future;
use std::sync::Arc;

use google_cloud_pubsub::client::google_cloud_auth::credentials::CredentialsFile;
use google_cloud_pubsub::client::{Client, ClientConfig};
use google_cloud_pubsub::subscriber::ReceivedMessage;
use google_cloud_pubsub::subscription::Subscription;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gate::DeliveryGate;
use crate::handler::{DeliveryHandler, Disposition};

/// One message as handed over by the queue, carrying its acknowledge and
/// negative-acknowledge capabilities. Exactly one of the two is consumed,
/// exactly once, and nothing is retained afterwards.
pub trait QueueMessage: Send {
    fn payload(&self) -> &[u8];

    fn ack(self) -> impl Future<Output = ()> + Send;

    fn nack(self) -> impl Future<Output = ()> + Send;
}

/// [`ReceivedMessage`] adapted to [`QueueMessage`]. Ack/nack RPC failures are
/// logged and dropped; an unacknowledged message is redelivered anyway.
pub struct PubsubQueueMessage(ReceivedMessage);

impl QueueMessage for PubsubQueueMessage {
    fn payload(&self) -> &[u8] {
        &self.0.message.data
    }

    fn ack(self) -> impl Future<Output = ()> + Send {
        async move {
            if let Err(e) = self.0.ack().await {
                error!("Failed to ack message: {}", e);
            }
        }
    }

    fn nack(self) -> impl Future<Output = ()> + Send {
        async move {
            if let Err(e) = self.0.nack().await {
                error!("Failed to nack message: {}", e);
            }
        }
    }
}

/// Gate plus handler. `process` is safe to call from concurrently running
/// subscriber tasks; the gate turns them into a strictly sequential stream
/// of delivery attempts.
pub struct DeliveryPipeline {
    gate: DeliveryGate,
    handler: DeliveryHandler,
}

impl DeliveryPipeline {
    pub fn new(gate: DeliveryGate, handler: DeliveryHandler) -> Self {
        Self { gate, handler }
    }

    pub async fn process<M: QueueMessage>(&self, message: M) {
        let _permit = self.gate.admit().await;
        match self.handler.handle(message.payload()).await {
            Disposition::Ack => message.ack().await,
            Disposition::Nack => message.nack().await,
        }
        // The permit drops here, stamping the cooldown after the ack/nack.
    }
}

pub struct Subscriber {
    subscription: Subscription,
}

impl Subscriber {
    /// Build the Pub/Sub client from the in-memory service account JSON and
    /// resolve the subscription.
    pub async fn connect(config: &Config) -> Result<Self> {
        let credentials = CredentialsFile::new_from_str(&config.service_account_key)
            .await
            .map_err(|e| Error::Credentials(e.to_string()))?;
        let mut client_config = ClientConfig::default()
            .with_credentials(credentials)
            .await
            .map_err(|e| Error::Credentials(e.to_string()))?;
        client_config.project_id = Some(config.project.clone());

        let client = Client::new(client_config)
            .await
            .map_err(|e| Error::PubSub(e.to_string()))?;
        Ok(Self {
            subscription: client.subscription(&config.subscription),
        })
    }

    /// Run until the token is cancelled or the subscription layer fails.
    /// Cancellation is graceful: in-flight handlers finish their ack/nack
    /// before this returns. Subscription errors are returned to the caller;
    /// redelivery after a restart is the queue's responsibility.
    pub async fn listen(
        &self,
        pipeline: Arc<DeliveryPipeline>,
        cancel: CancellationToken,
    ) -> Result<()> {
        info!(
            "Listening for messages on {}...",
            self.subscription.fully_qualified_name()
        );
        self.subscription
            .receive(
                move |message, _cancel| {
                    let pipeline = Arc::clone(&pipeline);
                    async move { pipeline.process(PubsubQueueMessage(message)).await }
                },
                cancel,
                None,
            )
            .await
            .map_err(|e| Error::PubSub(e.to_string()))
    }
}
