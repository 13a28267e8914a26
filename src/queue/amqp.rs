use crate::queue::{Broker, InboundMessage};
use anyhow::Context;
use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, BasicQosOptions,
    BasicRejectOptions, QueueDeclareOptions,
};
use lapin::types::{FieldTable, ShortString};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer};
use tracing::info;

const CONSUMER_TAG: &str = "author-management-service";

/// RabbitMQ broker consuming one queue with a prefetch of one.
pub struct AmqpBroker {
    _connection: Connection,
    channel: Channel,
    consumer: Consumer,
}

impl AmqpBroker {
    pub async fn connect(url: &str, queue: &str) -> anyhow::Result<Self> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .with_context(|| format!("Failed to connect to broker at {url}"))?;
        let channel = connection
            .create_channel()
            .await
            .context("Failed to open broker channel")?;

        channel
            .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
            .await
            .with_context(|| format!("Failed to declare queue {queue}"))?;
        channel
            .basic_qos(1, BasicQosOptions::default())
            .await
            .context("Failed to set prefetch count")?;
        let consumer = channel
            .basic_consume(
                queue,
                CONSUMER_TAG,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .with_context(|| format!("Failed to consume from queue {queue}"))?;

        info!(queue, "Connected to broker");
        Ok(Self {
            _connection: connection,
            channel,
            consumer,
        })
    }
}

#[async_trait]
impl Broker for AmqpBroker {
    async fn next_message(&mut self) -> Option<anyhow::Result<InboundMessage>> {
        let delivery = self.consumer.next().await?;
        Some(
            delivery
                .map(|delivery| InboundMessage {
                    delivery_tag: delivery.delivery_tag,
                    correlation_id: delivery
                        .properties
                        .correlation_id()
                        .as_ref()
                        .map(|id| id.as_str().to_owned()),
                    reply_to: delivery
                        .properties
                        .reply_to()
                        .as_ref()
                        .map(|to| to.as_str().to_owned()),
                    body: delivery.data,
                })
                .context("Broker delivery failed"),
        )
    }

    async fn publish(
        &self,
        destination: &str,
        correlation_id: Option<&str>,
        body: &[u8],
    ) -> anyhow::Result<()> {
        let mut properties = BasicProperties::default();
        if let Some(correlation_id) = correlation_id {
            properties = properties.with_correlation_id(ShortString::from(correlation_id));
        }

        self.channel
            .basic_publish(
                "",
                destination,
                BasicPublishOptions::default(),
                body,
                properties,
            )
            .await?
            .await?;
        Ok(())
    }

    async fn ack(&self, delivery_tag: u64) -> anyhow::Result<()> {
        self.channel
            .basic_ack(delivery_tag, BasicAckOptions::default())
            .await?;
        Ok(())
    }

    async fn reject(&self, delivery_tag: u64) -> anyhow::Result<()> {
        self.channel
            .basic_reject(delivery_tag, BasicRejectOptions { requeue: false })
            .await?;
        Ok(())
    }
}
