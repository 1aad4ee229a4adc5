//! Bus listener driving index invalidation.
//!
//! Events are a latency optimization; the TTL refresher remains the
//! correctness backstop, so a dropped or unknown message is only logged.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use stripdex_core::{Closer, Error, Event, Result};

use crate::service::SearchService;

/// NATS subscription on the configured topic.
pub struct NatsListener {
    client: async_nats::Client,
    subscriber: async_nats::Subscriber,
}

impl NatsListener {
    pub async fn connect(address: &str, topic: &str) -> Result<Self> {
        let client = async_nats::connect(address)
            .await
            .map_err(|err| Error::Unavailable(format!("failed to connect to broker: {err}")))?;
        let subscriber = client
            .subscribe(topic.to_string())
            .await
            .map_err(|err| Error::Unavailable(format!("failed to subscribe: {err}")))?;
        Ok(Self { client, subscriber })
    }

    /// Client handle for shutdown bookkeeping.
    pub fn client(&self) -> async_nats::Client {
        self.client.clone()
    }

    /// Consume the subscription until the connection goes away.
    pub async fn listen(mut self, service: Arc<SearchService>) {
        while let Some(message) = self.subscriber.next().await {
            handle_event(&service, &message.payload).await;
        }
        tracing::warn!("bus subscription ended");
    }
}

pub(crate) async fn handle_event(service: &SearchService, payload: &[u8]) {
    match Event::from_payload(payload) {
        Some(Event::Updated) => {
            tracing::info!("update event received, rebuilding index");
            if let Err(err) = service.index_comics().await {
                tracing::error!(error = %err, "failed to rebuild index");
            }
        }
        Some(Event::Dropped) => {
            tracing::info!("drop event received, clearing index");
            service.clear_index();
        }
        None => {
            tracing::warn!(
                payload = %String::from_utf8_lossy(payload),
                "ignoring unknown bus payload"
            );
        }
    }
}

/// Flushes the broker connection during shutdown.
pub struct BusCloser(pub async_nats::Client);

#[async_trait]
impl Closer for BusCloser {
    fn name(&self) -> &'static str {
        "nats listener"
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.0.flush().await?;
        Ok(())
    }
}
