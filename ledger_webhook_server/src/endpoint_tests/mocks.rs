use chrono::{DateTime, Utc};
use ledger_webhook_engine::{
    db_types::{Credential, NewCredential, TenantId, WebhookEvent},
    traits::{CredentialApiError, CredentialManagement, EventApiError, EventManagement},
};
use mockall::mock;
use oauth_tools::{OAuthApiError, TokenExchange, TokenResponse};

mock! {
    pub CredentialManager {}
    impl CredentialManagement for CredentialManager {
        async fn upsert_credential(&self, credential: &NewCredential) -> Result<Credential, CredentialApiError>;
        async fn fetch_credential(&self, tenant_id: &TenantId) -> Result<Option<Credential>, CredentialApiError>;
        async fn fetch_all_credentials(&self) -> Result<Vec<Credential>, CredentialApiError>;
        async fn fetch_credentials_expiring_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Credential>, CredentialApiError>;
        async fn delete_credential(&self, tenant_id: &TenantId) -> Result<bool, CredentialApiError>;
    }
}

mock! {
    pub EventManager {}
    impl EventManagement for EventManager {
        async fn insert_event(&self, payload: &str) -> Result<WebhookEvent, EventApiError>;
        async fn fetch_all_events(&self) -> Result<Vec<WebhookEvent>, EventApiError>;
        async fn count_events(&self) -> Result<i64, EventApiError>;
    }
}

mock! {
    pub OAuthClient {}
    impl TokenExchange for OAuthClient {
        async fn revoke_token(&self, refresh_token: &str) -> Result<(), OAuthApiError>;
        async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, OAuthApiError>;
    }
}
