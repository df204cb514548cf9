use std::fmt::{self, Debug, Display};

use chrono::{DateTime, Utc};
use lwg_common::mask_secret;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

//--------------------------------------      TenantId      ----------------------------------------------------------
/// A lightweight wrapper around the unique identifier of a connected company (realm) on the accounting platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for TenantId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

//--------------------------------------     Credential     ----------------------------------------------------------
/// One tenant's authorization grant against the accounting platform.
///
/// The access and refresh tokens are secret material. `Debug` renders masked values, and the struct deliberately
/// does not implement `Serialize`; operator-facing views must go through a masked summary type.
#[derive(Clone, FromRow)]
pub struct Credential {
    pub id: i64,
    pub tenant_id: TenantId,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("tenant_id", &self.tenant_id)
            .field("access_token", &mask_secret(&self.access_token))
            .field("refresh_token", &mask_secret(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

//--------------------------------------    NewCredential   ----------------------------------------------------------
/// The payload the authorization-callback collaborator submits when a tenant completes (or renews) the OAuth2
/// handshake. Upserted into the store keyed on `tenant_id`.
#[derive(Clone, Deserialize)]
pub struct NewCredential {
    pub tenant_id: TenantId,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("tenant_id", &self.tenant_id)
            .field("access_token", &mask_secret(&self.access_token))
            .field("refresh_token", &mask_secret(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

//--------------------------------------    WebhookEvent    ----------------------------------------------------------
/// A verified inbound notification, exactly as transmitted. Immutable once stored; `id` order is arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct WebhookEvent {
    pub id: i64,
    pub payload: String,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;

    #[test]
    fn debug_output_masks_token_material() {
        let cred = NewCredential {
            tenant_id: TenantId::from("4620816365291234567"),
            access_token: "AT-2f7e1c993b1d4e0f8a6b".to_string(),
            refresh_token: "RT1-9f3a7c2e55d1aa0042".to_string(),
            expires_at: Utc::now(),
        };
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("AT-2f7e1c993b1d4e0f8a6b"));
        assert!(!rendered.contains("RT1-9f3a7c2e55d1aa0042"));
        assert!(rendered.contains("RT1-9f3a7c..."));
    }
}
