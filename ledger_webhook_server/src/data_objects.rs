use std::fmt::Display;

use chrono::{DateTime, Utc};
use ledger_webhook_engine::db_types::{Credential, TenantId};
use lwg_common::mask_secret;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// A display-safe view of a stored credential for operator listings. Only a masked prefix of the refresh token is
/// included, enough to recognise the grant without exposing usable secret material.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialSummary {
    pub tenant_id: TenantId,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&Credential> for CredentialSummary {
    fn from(credential: &Credential) -> Self {
        Self {
            tenant_id: credential.tenant_id.clone(),
            refresh_token: mask_secret(&credential.refresh_token),
            expires_at: credential.expires_at,
        }
    }
}
