//! SQLite database operations for the append-only webhook event log.
//!
//! Generally clients should never call these methods directly, and prefer to use the [`EventManagement`] trait
//! methods that are implemented on the [`SqliteDatabase`](crate::SqliteDatabase) struct instead.
//!
//! [`EventManagement`]: crate::traits::EventManagement

use chrono::Utc;
use log::trace;
use sqlx::SqliteConnection;

use crate::{db_types::WebhookEvent, traits::EventApiError};

pub async fn insert_event(payload: &str, conn: &mut SqliteConnection) -> Result<WebhookEvent, EventApiError> {
    let received_at = Utc::now();
    let res = sqlx::query("INSERT INTO webhook_events (payload, received_at) VALUES (?, ?)")
        .bind(payload)
        .bind(received_at)
        .execute(&mut *conn)
        .await?;
    let id = res.last_insert_rowid();
    trace!("🗃️ Webhook event #{id} has been recorded");
    Ok(WebhookEvent { id, payload: payload.to_string(), received_at })
}

pub async fn fetch_all_events(conn: &mut SqliteConnection) -> Result<Vec<WebhookEvent>, EventApiError> {
    let events =
        sqlx::query_as::<_, WebhookEvent>("SELECT id, payload, received_at FROM webhook_events ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
    Ok(events)
}

pub async fn count_events(conn: &mut SqliteConnection) -> Result<i64, EventApiError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT count(id) FROM webhook_events").fetch_one(&mut *conn).await?;
    Ok(count)
}
