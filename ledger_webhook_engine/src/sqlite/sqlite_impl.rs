//! `SqliteDatabase` is a concrete implementation of the webhook gateway storage backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`traits`](crate::traits) module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::info;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::db::{credentials, events, new_pool};
use crate::{
    db_types::{Credential, NewCredential, TenantId, WebhookEvent},
    traits::{CredentialApiError, CredentialManagement, EventApiError, EventManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connect to the SQLite database at `url`, creating it if it does not exist yet, and bring the schema up to
    /// date by running any outstanding migrations.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
            info!("🗃️ Created new Sqlite database at {url}");
        }
        let pool = new_pool(url, max_connections).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl CredentialManagement for SqliteDatabase {
    async fn upsert_credential(&self, credential: &NewCredential) -> Result<Credential, CredentialApiError> {
        let mut conn = self.pool.acquire().await?;
        credentials::upsert_credential(credential, &mut conn).await
    }

    async fn fetch_credential(&self, tenant_id: &TenantId) -> Result<Option<Credential>, CredentialApiError> {
        let mut conn = self.pool.acquire().await?;
        credentials::fetch_credential(tenant_id, &mut conn).await
    }

    async fn fetch_all_credentials(&self) -> Result<Vec<Credential>, CredentialApiError> {
        let mut conn = self.pool.acquire().await?;
        credentials::fetch_all_credentials(&mut conn).await
    }

    async fn fetch_credentials_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Credential>, CredentialApiError> {
        let mut conn = self.pool.acquire().await?;
        credentials::fetch_credentials_expiring_before(cutoff, &mut conn).await
    }

    async fn delete_credential(&self, tenant_id: &TenantId) -> Result<bool, CredentialApiError> {
        let mut conn = self.pool.acquire().await?;
        credentials::delete_credential(tenant_id, &mut conn).await
    }
}

impl EventManagement for SqliteDatabase {
    async fn insert_event(&self, payload: &str) -> Result<WebhookEvent, EventApiError> {
        let mut conn = self.pool.acquire().await?;
        events::insert_event(payload, &mut conn).await
    }

    async fn fetch_all_events(&self) -> Result<Vec<WebhookEvent>, EventApiError> {
        let mut conn = self.pool.acquire().await?;
        events::fetch_all_events(&mut conn).await
    }

    async fn count_events(&self) -> Result<i64, EventApiError> {
        let mut conn = self.pool.acquire().await?;
        events::count_events(&mut conn).await
    }
}
