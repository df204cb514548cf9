//! Credential lifecycle operations against the platform's token service.
//!
//! Both operations follow the same shape: look the tenant's credential up in the store, perform the remote call,
//! and only then mutate the store. For revocation in particular, external confirmation strictly precedes local
//! deletion. Deleting first would leave a token that is still valid on the platform with no local record of it.

use chrono::{Duration, Utc};
use ledger_webhook_engine::{
    db_types::{Credential, NewCredential, TenantId},
    traits::CredentialManagement,
    CredentialApi,
};
use log::{info, warn};
use oauth_tools::{OAuthApiError, TokenExchange};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CredentialLifecycleError {
    #[error("No credential is stored for tenant {0}.")]
    CredentialNotFound(TenantId),
    #[error("The platform rejected the request. {0}")]
    ExternalRejected(String),
    #[error("The platform could not be reached. {0}")]
    ExternalUnreachable(String),
    #[error("Credential store failure. {0}")]
    StoreError(String),
}

impl From<OAuthApiError> for CredentialLifecycleError {
    fn from(e: OAuthApiError) -> Self {
        match e {
            OAuthApiError::Rejected { status, message } => {
                CredentialLifecycleError::ExternalRejected(format!("Status {status}. {message}"))
            },
            OAuthApiError::ResponseError(e) => {
                CredentialLifecycleError::ExternalRejected(format!("Malformed response. {e}"))
            },
            e => CredentialLifecycleError::ExternalUnreachable(e.to_string()),
        }
    }
}

/// Revoke a tenant's grant. The stored credential is removed only after the platform confirms the revocation
/// with a success status; on any rejection or transport failure the record is left untouched, so the operation
/// can simply be retried.
pub async fn revoke_tenant_credential<B, C>(
    tenant_id: &TenantId,
    credentials: &CredentialApi<B>,
    oauth: &C,
) -> Result<(), CredentialLifecycleError>
where
    B: CredentialManagement,
    C: TokenExchange,
{
    let credential = fetch_tenant_credential(tenant_id, credentials).await?;
    oauth.revoke_token(&credential.refresh_token).await?;
    let removed =
        credentials.delete(tenant_id).await.map_err(|e| CredentialLifecycleError::StoreError(e.to_string()))?;
    if removed {
        info!("🔑️ Credential for tenant {tenant_id} revoked and removed from the store.");
    } else {
        // A concurrent revocation got there first. The grant is gone on the platform either way.
        warn!("🔑️ Credential for tenant {tenant_id} was already gone when revocation completed.");
    }
    Ok(())
}

/// Exchange a tenant's refresh token for a fresh access token and store the result. If the platform rotates the
/// refresh token, the new one replaces the old; otherwise the stored refresh token is kept.
pub async fn refresh_tenant_credential<B, C>(
    tenant_id: &TenantId,
    credentials: &CredentialApi<B>,
    oauth: &C,
) -> Result<Credential, CredentialLifecycleError>
where
    B: CredentialManagement,
    C: TokenExchange,
{
    let credential = fetch_tenant_credential(tenant_id, credentials).await?;
    let tokens = oauth.refresh_token(&credential.refresh_token).await?;
    let refresh_token = tokens.refresh_token.unwrap_or(credential.refresh_token);
    let renewed = NewCredential {
        tenant_id: credential.tenant_id,
        access_token: tokens.access_token,
        refresh_token,
        expires_at: Utc::now() + Duration::seconds(tokens.expires_in as i64),
    };
    let updated =
        credentials.upsert(&renewed).await.map_err(|e| CredentialLifecycleError::StoreError(e.to_string()))?;
    info!("🔑️ Access token for tenant {tenant_id} refreshed; valid until {}", updated.expires_at);
    Ok(updated)
}

/// A stored record with an empty refresh token is useless for both lifecycle operations and is reported the same
/// way as a missing one.
async fn fetch_tenant_credential<B: CredentialManagement>(
    tenant_id: &TenantId,
    credentials: &CredentialApi<B>,
) -> Result<Credential, CredentialLifecycleError> {
    let credential = credentials
        .credential_for_tenant(tenant_id)
        .await
        .map_err(|e| CredentialLifecycleError::StoreError(e.to_string()))?
        .ok_or_else(|| CredentialLifecycleError::CredentialNotFound(tenant_id.clone()))?;
    if credential.refresh_token.is_empty() {
        warn!("🔑️ Tenant {tenant_id} has a credential record without a refresh token.");
        return Err(CredentialLifecycleError::CredentialNotFound(tenant_id.clone()));
    }
    Ok(credential)
}
