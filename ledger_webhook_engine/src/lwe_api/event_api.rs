use std::fmt::Debug;

use log::debug;

use crate::{
    db_types::WebhookEvent,
    events::{EventProducers, WebhookReceivedEvent},
    traits::{EventApiError, EventManagement},
};

/// `EventApi` is the primary API for recording verified webhook notifications and reading the event log back
/// for audit.
pub struct EventApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for EventApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventApi")
    }
}

impl<B> EventApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> EventApi<B>
where B: EventManagement
{
    /// Append a verified payload to the event log.
    ///
    /// The payload must already have passed signature verification; the log never holds unverified material.
    /// After the entry is committed, subscribers are notified via the webhook-received hook. Handlers run on
    /// their own tasks, so acknowledgement of the delivery does not wait for them.
    pub async fn record_event(&self, payload: &str) -> Result<WebhookEvent, EventApiError> {
        let event = self.db.insert_event(payload).await?;
        self.call_webhook_received_hook(&event).await;
        Ok(event)
    }

    async fn call_webhook_received_hook(&self, event: &WebhookEvent) {
        for emitter in &self.producers.webhook_received_producer {
            debug!("📬️ Notifying webhook received hook subscribers");
            emitter.publish_event(WebhookReceivedEvent::new(event.clone())).await;
        }
    }

    /// Fetches all recorded events in arrival order.
    pub async fn all_events(&self) -> Result<Vec<WebhookEvent>, EventApiError> {
        self.db.fetch_all_events().await
    }

    /// The number of events currently in the log.
    pub async fn count(&self) -> Result<i64, EventApiError> {
        self.db.count_events().await
    }
}
