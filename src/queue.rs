pub mod amqp;
pub mod memory;

use crate::codec;
use crate::response::build_response;
use crate::router::{CommandRouter, DispatchError};
use crate::store::AuthorStore;
use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, warn};

/// One delivery taken off the command queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub delivery_tag: u64,
    pub body: Vec<u8>,
    pub correlation_id: Option<String>,
    pub reply_to: Option<String>,
}

/// Message broker port used by [`QueueAdapter`].
#[async_trait]
pub trait Broker: Send + Sync {
    /// Waits for the next delivery. `None` means the consumer was closed.
    async fn next_message(&mut self) -> Option<anyhow::Result<InboundMessage>>;

    async fn publish(
        &self,
        destination: &str,
        correlation_id: Option<&str>,
        body: &[u8],
    ) -> anyhow::Result<()>;

    async fn ack(&self, delivery_tag: u64) -> anyhow::Result<()>;

    /// Drops a delivery without requeueing it.
    async fn reject(&self, delivery_tag: u64) -> anyhow::Result<()>;
}

/// Consumes commands from a broker and publishes one reply per command.
///
/// Deliveries are handled strictly one at a time: a message is acknowledged
/// only after its reply was published, and the next message is not read
/// before that.
pub struct QueueAdapter<S, B> {
    router: CommandRouter<S>,
    broker: B,
}

impl<S: AuthorStore, B: Broker> QueueAdapter<S, B> {
    pub const fn new(router: CommandRouter<S>, broker: B) -> Self {
        Self { router, broker }
    }

    /// Runs until the broker closes the consumer.
    ///
    /// Broker failures end the loop with an error. Malformed messages never do.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Waiting for commands");
        while let Some(message) = self.broker.next_message().await {
            let message = message.context("Failed to receive message from broker")?;
            self.handle(message).await?;
        }

        info!("Broker closed the consumer");
        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        fields(
            delivery_tag = message.delivery_tag,
            correlation_id = message.correlation_id.as_deref()
        )
    )]
    pub async fn handle(&self, message: InboundMessage) -> anyhow::Result<()> {
        let outcome = match codec::decode_command(&message.body) {
            Ok(command) => self.router.dispatch(command).await,
            Err(err) if message.reply_to.is_none() => {
                warn!(error = %err, "Rejecting malformed message without reply destination");
                return self
                    .broker
                    .reject(message.delivery_tag)
                    .await
                    .context("Failed to reject message");
            }
            Err(err) => {
                warn!(error = %err, "Answering malformed message with an error");
                Err(DispatchError::from(err))
            }
        };

        let response = build_response(outcome);
        info!(success = response.success, "Processed command");

        match message.reply_to.as_deref() {
            Some(reply_to) => {
                let body = codec::encode_response(&response);
                self.broker
                    .publish(reply_to, message.correlation_id.as_deref(), &body)
                    .await
                    .with_context(|| format!("Failed to publish reply to {reply_to}"))?;
            }
            None => warn!("Message has no reply destination, dropping reply"),
        }

        self.broker
            .ack(message.delivery_tag)
            .await
            .context("Failed to acknowledge message")
    }
}
