//! # Ledger Webhook Engine
//!
//! The engine holds everything the webhook gateway persists: per-tenant OAuth2 credentials and the append-only
//! log of verified webhook notifications. It is web-framework agnostic.
//!
//! The library is divided into two main sections:
//! 1. Storage contracts and backends. The [`traits`] module defines the behaviour a backend must expose
//!    ([`traits::CredentialManagement`] and [`traits::EventManagement`]); [`SqliteDatabase`] is the SQLite
//!    implementation. Clients should never need to touch the database directly, with the exception of the data
//!    types in [`db_types`], which are public.
//! 2. The public API wrappers ([`CredentialApi`] and [`EventApi`]). An API instance is created by supplying any
//!    backend that implements the relevant trait, which is also what makes the HTTP layer testable against mocks.
//!
//! The engine also provides a small hook system ([`events`]) so that other components can react to accepted
//! webhooks asynchronously, outside the acknowledgement path.
pub mod db_types;
pub mod events;
pub mod traits;

mod lwe_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use lwe_api::{credential_api::CredentialApi, event_api::EventApi};
