use crate::queue::{Broker, InboundMessage};
use anyhow::bail;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub destination: String,
    pub correlation_id: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Default)]
struct Ledger {
    next_tag: u64,
    published: Vec<PublishedMessage>,
    acked: Vec<u64>,
    rejected: Vec<u64>,
    closed_destinations: HashSet<String>,
}

/// In-process broker. Messages are queued through a [`MemoryBrokerHandle`].
#[derive(Debug)]
pub struct MemoryBroker {
    receiver: mpsc::UnboundedReceiver<InboundMessage>,
    ledger: Arc<Mutex<Ledger>>,
}

/// Producer side of a [`MemoryBroker`], also used to inspect what the
/// consumer published and acknowledged.
#[derive(Debug)]
pub struct MemoryBrokerHandle {
    sender: Option<mpsc::UnboundedSender<InboundMessage>>,
    ledger: Arc<Mutex<Ledger>>,
}

/// Creates a connected broker and handle pair.
pub fn channel() -> (MemoryBroker, MemoryBrokerHandle) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let ledger = Arc::new(Mutex::new(Ledger::default()));
    let broker = MemoryBroker {
        receiver,
        ledger: Arc::clone(&ledger),
    };
    let handle = MemoryBrokerHandle {
        sender: Some(sender),
        ledger,
    };
    (broker, handle)
}

impl MemoryBrokerHandle {
    /// Queues a message and returns its delivery tag.
    pub async fn send(
        &self,
        body: Vec<u8>,
        correlation_id: Option<&str>,
        reply_to: Option<&str>,
    ) -> anyhow::Result<u64> {
        let Some(sender) = &self.sender else {
            bail!("Broker handle is closed");
        };

        let delivery_tag = {
            let mut ledger = self.ledger.lock().await;
            ledger.next_tag += 1;
            ledger.next_tag
        };
        sender.send(InboundMessage {
            delivery_tag,
            body,
            correlation_id: correlation_id.map(str::to_owned),
            reply_to: reply_to.map(str::to_owned),
        })?;

        Ok(delivery_tag)
    }

    /// Stops accepting messages; the consumer ends once the queue drains.
    pub fn close(&mut self) {
        self.sender = None;
    }

    /// Makes every later publish to `destination` fail.
    pub async fn close_destination(&self, destination: &str) {
        self.ledger
            .lock()
            .await
            .closed_destinations
            .insert(destination.to_owned());
    }

    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.ledger.lock().await.published.clone()
    }

    pub async fn acked(&self) -> Vec<u64> {
        self.ledger.lock().await.acked.clone()
    }

    pub async fn rejected(&self) -> Vec<u64> {
        self.ledger.lock().await.rejected.clone()
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    async fn next_message(&mut self) -> Option<anyhow::Result<InboundMessage>> {
        self.receiver.recv().await.map(Ok)
    }

    async fn publish(
        &self,
        destination: &str,
        correlation_id: Option<&str>,
        body: &[u8],
    ) -> anyhow::Result<()> {
        let mut ledger = self.ledger.lock().await;
        if ledger.closed_destinations.contains(destination) {
            bail!("Destination {destination} is closed");
        }

        ledger.published.push(PublishedMessage {
            destination: destination.to_owned(),
            correlation_id: correlation_id.map(str::to_owned),
            body: body.to_vec(),
        });
        Ok(())
    }

    async fn ack(&self, delivery_tag: u64) -> anyhow::Result<()> {
        self.ledger.lock().await.acked.push(delivery_tag);
        Ok(())
    }

    async fn reject(&self, delivery_tag: u64) -> anyhow::Result<()> {
        self.ledger.lock().await.rejected.push(delivery_tag);
        Ok(())
    }
}
