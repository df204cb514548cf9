//! # Storage contracts
//!
//! This module defines the interface contracts that webhook gateway storage *backends* must fulfil.
//!
//! * [`CredentialManagement`] covers the per-tenant credential store: upsert, lookup, enumeration, and deletion of
//!   OAuth2 token records. The contract is deliberately independent of the backing technology; any durable
//!   key-value or relational store can implement it.
//! * [`EventManagement`] covers the append-only webhook event log. The only mutation is an append; listings are
//!   snapshot-consistent and ordered by arrival.
//!
//! Both traits are implemented by [`crate::SqliteDatabase`]. Error types live next to their trait so that callers
//! can depend on a single module for the full contract.
mod credential_management;
mod event_management;

pub use credential_management::{CredentialApiError, CredentialManagement};
pub use event_management::{EventApiError, EventManagement};
