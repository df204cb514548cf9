//! Unifies API for accessing the per-tenant credential store.

use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::{
    db_types::{Credential, NewCredential, TenantId},
    traits::{CredentialApiError, CredentialManagement},
};

/// The `CredentialApi` provides a unified API for managing tenant credentials.
pub struct CredentialApi<B> {
    db: B,
}

impl<B: Debug> Debug for CredentialApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialApi ({:?})", self.db)
    }
}

impl<B> CredentialApi<B>
where B: CredentialManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Store a credential, replacing any existing record for the same tenant. There is never more than one
    /// credential per tenant.
    pub async fn upsert(&self, credential: &NewCredential) -> Result<Credential, CredentialApiError> {
        self.db.upsert_credential(credential).await
    }

    /// Fetches the credential for the given tenant. If no credential exists, `None` is returned.
    pub async fn credential_for_tenant(&self, tenant_id: &TenantId) -> Result<Option<Credential>, CredentialApiError> {
        self.db.fetch_credential(tenant_id).await
    }

    /// Fetches every stored credential, ordered by tenant id.
    pub async fn all_credentials(&self) -> Result<Vec<Credential>, CredentialApiError> {
        self.db.fetch_all_credentials().await
    }

    /// Fetches the credentials whose access token expires on or before `cutoff`, soonest first. This feeds the
    /// background refresh worker.
    pub async fn credentials_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Credential>, CredentialApiError> {
        self.db.fetch_credentials_expiring_before(cutoff).await
    }

    /// Deletes the credential for the given tenant, returning `true` iff a record was removed. Only call this
    /// after the platform has confirmed revocation; deleting first would orphan a token that is still valid
    /// remotely.
    pub async fn delete(&self, tenant_id: &TenantId) -> Result<bool, CredentialApiError> {
        self.db.delete_credential(tenant_id).await
    }
}
