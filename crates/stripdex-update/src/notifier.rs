//! Bus publisher for catalog lifecycle events.

use async_trait::async_trait;

use stripdex_core::{Closer, Error, Event, Result};

/// Publishes lifecycle events. Delivery is fire-and-forget; callers log
/// failures and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, event: Event) -> Result<()>;
}

/// NATS-backed notifier publishing on a single configured topic.
#[derive(Clone)]
pub struct NatsNotifier {
    client: async_nats::Client,
    topic: String,
}

impl NatsNotifier {
    pub async fn connect(address: &str, topic: &str) -> Result<Self> {
        let client = async_nats::connect(address)
            .await
            .map_err(|err| Error::Unavailable(format!("failed to connect to broker: {err}")))?;
        Ok(Self {
            client,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    async fn publish(&self, event: Event) -> Result<()> {
        self.client
            .publish(self.topic.clone(), event.as_bytes().to_vec().into())
            .await
            .map_err(|err| Error::Unavailable(format!("failed to publish: {err}")))?;
        self.client
            .flush()
            .await
            .map_err(|err| Error::Unavailable(format!("failed to flush: {err}")))?;
        tracing::info!(topic = %self.topic, event = ?event, "event published");
        Ok(())
    }
}

#[async_trait]
impl Closer for NatsNotifier {
    fn name(&self) -> &'static str {
        "nats notifier"
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.client.flush().await?;
        Ok(())
    }
}
