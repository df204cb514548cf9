//! # Webhook engine public API
//!
//! The `lwe_api` module exposes the programmatic API for the webhook engine. The API is modular, so that clients
//! can pick and choose the functionality they need; credentials and events could even be served by different
//! backends.
//!
//! * [`credential_api`] manages the per-tenant OAuth2 credential records: upsert on (re-)authorization or
//!   refresh, lookup, enumeration for operator views, and deletion after confirmed revocation.
//! * [`event_api`] appends verified webhook payloads to the event log and notifies hook subscribers.
//!
//! # API usage
//!
//! The pattern for both APIs is the same. An API instance is created by supplying a database backend that
//! implements the backend traits required by the API.
//!
//! For example, to look up a tenant's credential:
//!
//! ```rust,ignore
//! use ledger_webhook_engine::{CredentialApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements CredentialManagement
//! let api = CredentialApi::new(db);
//! let credential = api.credential_for_tenant(&tenant_id).await?;
//! ```

pub mod credential_api;
pub mod event_api;
