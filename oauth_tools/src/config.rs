use std::time::Duration;

use log::*;
use lwg_common::Secret;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// The app's client identifier on the accounting platform's developer portal.
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// The platform's token endpoint, used for refresh grants.
    pub token_url: String,
    /// The platform's token revocation endpoint.
    pub revocation_url: String,
    /// Hard deadline for any single outbound call. A call that exceeds it reports the service as unreachable
    /// rather than blocking indefinitely.
    pub timeout: Duration,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::default(),
            client_secret: Secret::default(),
            token_url: "https://oauth.platform.example.com/oauth2/v1/tokens/bearer".to_string(),
            revocation_url: "https://oauth.platform.example.com/oauth2/v1/tokens/revoke".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OAuthConfig {
    pub fn new_from_env_or_default() -> Self {
        let defaults = OAuthConfig::default();
        let client_id = std::env::var("LWG_OAUTH_CLIENT_ID").unwrap_or_else(|_| {
            warn!("LWG_OAUTH_CLIENT_ID not set. Token revocation and refresh calls will be rejected.");
            defaults.client_id
        });
        let client_secret = Secret::new(std::env::var("LWG_OAUTH_CLIENT_SECRET").unwrap_or_else(|_| {
            warn!("LWG_OAUTH_CLIENT_SECRET not set. Token revocation and refresh calls will be rejected.");
            String::default()
        }));
        let token_url = std::env::var("LWG_OAUTH_TOKEN_URL").unwrap_or_else(|_| {
            warn!("LWG_OAUTH_TOKEN_URL not set, using {} as default", defaults.token_url);
            defaults.token_url
        });
        let revocation_url = std::env::var("LWG_OAUTH_REVOCATION_URL").unwrap_or_else(|_| {
            warn!("LWG_OAUTH_REVOCATION_URL not set, using {} as default", defaults.revocation_url);
            defaults.revocation_url
        });
        let timeout = std::env::var("LWG_OAUTH_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid configuration value for LWG_OAUTH_TIMEOUT. {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        Self { client_id, client_secret, token_url, revocation_url, timeout }
    }
}
