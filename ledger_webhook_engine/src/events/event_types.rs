use crate::db_types::WebhookEvent;

/// Emitted after a verified webhook payload has been committed to the event log. Subscribers run outside the
/// acknowledgement path, so any downstream parsing or routing of the payload never delays the 200 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReceivedEvent {
    pub event: WebhookEvent,
}

impl WebhookReceivedEvent {
    pub fn new(event: WebhookEvent) -> Self {
        Self { event }
    }
}
