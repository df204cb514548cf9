use thiserror::Error;

use crate::db_types::WebhookEvent;

#[derive(Debug, Clone, Error)]
pub enum EventApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for EventApiError {
    fn from(e: sqlx::Error) -> Self {
        EventApiError::DatabaseError(e.to_string())
    }
}

/// The `EventManagement` trait defines behaviour for the append-only webhook event log.
///
/// Only payloads that have already passed signature verification may be appended; the log never contains
/// unverified material. Entries are immutable and are never individually deleted. Backends must tolerate many
/// concurrent appenders without losing entries, and listings must never render a partially written entry.
#[allow(async_fn_in_trait)]
pub trait EventManagement {
    /// Append a verified payload to the log and return the stored entry.
    async fn insert_event(&self, payload: &str) -> Result<WebhookEvent, EventApiError>;

    /// Fetches all recorded events in arrival order. The listing is a snapshot; appends racing with the call may
    /// or may not be included, but nothing already present is lost.
    async fn fetch_all_events(&self) -> Result<Vec<WebhookEvent>, EventApiError>;

    /// The number of events currently in the log.
    async fn count_events(&self) -> Result<i64, EventApiError>;
}
