use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{Credential, NewCredential, TenantId};

#[derive(Debug, Clone, Error)]
pub enum CredentialApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CredentialApiError {
    fn from(e: sqlx::Error) -> Self {
        CredentialApiError::DatabaseError(e.to_string())
    }
}

/// The `CredentialManagement` trait defines behaviour for the per-tenant credential store.
///
/// A credential is the OAuth2 access+refresh token pair authorizing calls on behalf of one connected tenant.
/// At most one credential exists per tenant identifier; writes are upserts keyed on the tenant id, so backends
/// never hold two grants for the same tenant. Concurrent callers must be safe without any external locking.
#[allow(async_fn_in_trait)]
pub trait CredentialManagement {
    /// Insert the credential, or replace the existing record for the same tenant. Returns the stored row.
    async fn upsert_credential(&self, credential: &NewCredential) -> Result<Credential, CredentialApiError>;

    /// Fetches the credential for the given tenant. If the tenant has never connected (or has been revoked),
    /// `None` is returned.
    async fn fetch_credential(&self, tenant_id: &TenantId) -> Result<Option<Credential>, CredentialApiError>;

    /// Fetches every stored credential, ordered by tenant id.
    async fn fetch_all_credentials(&self) -> Result<Vec<Credential>, CredentialApiError>;

    /// Fetches the credentials whose access token expires on or before `cutoff`, soonest first.
    async fn fetch_credentials_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Credential>, CredentialApiError>;

    /// Deletes the credential for the given tenant. Returns `true` iff a record was removed.
    async fn delete_credential(&self, tenant_id: &TenantId) -> Result<bool, CredentialApiError>;
}
