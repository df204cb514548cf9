use std::sync::Arc;

use log::*;
use reqwest::{Client, Response};

use crate::{config::OAuthConfig, data_objects::TokenResponse, OAuthApiError};

/// The operations the gateway performs against the platform's token service, as named methods so that each call
/// site's contract is visible at its declaration. [`OAuthApi`] is the production implementation; tests substitute
/// a mock.
#[allow(async_fn_in_trait)]
pub trait TokenExchange {
    /// Ask the platform to revoke the given refresh token, and with it the tenant's entire grant.
    /// `Ok(())` means the platform confirmed the revocation; only then may the local record be discarded.
    async fn revoke_token(&self, refresh_token: &str) -> Result<(), OAuthApiError>;

    /// Exchange the given refresh token for a fresh access token (and possibly a rotated refresh token).
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, OAuthApiError>;
}

#[derive(Clone)]
pub struct OAuthApi {
    config: OAuthConfig,
    client: Arc<Client>,
}

impl OAuthApi {
    pub fn new(config: OAuthConfig) -> Result<Self, OAuthApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OAuthApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// POST a form-encoded body to the token service, authenticated with the app's client credentials
    /// (HTTP Basic over client id and secret). A transport failure, including hitting the configured timeout,
    /// reports the service as unreachable; the caller never blocks past the deadline.
    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> Result<Response, OAuthApiError> {
        trace!("Sending token service request: {url}");
        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.client_id, Some(self.config.client_secret.reveal()))
            .form(params)
            .send()
            .await
            .map_err(|e| OAuthApiError::Unreachable(e.to_string()))?;
        trace!("Token service responded. {}", response.status());
        Ok(response)
    }
}

impl TokenExchange for OAuthApi {
    async fn revoke_token(&self, refresh_token: &str) -> Result<(), OAuthApiError> {
        let response = self.post_form(&self.config.revocation_url, &[("token", refresh_token)]).await?;
        let status = response.status();
        if status.is_success() {
            debug!("Token revocation confirmed by the platform. {status}");
            Ok(())
        } else {
            let message = response.text().await.map_err(|e| OAuthApiError::ResponseError(e.to_string()))?;
            Err(OAuthApiError::Rejected { status: status.as_u16(), message })
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, OAuthApiError> {
        let params = [("grant_type", "refresh_token"), ("refresh_token", refresh_token)];
        let response = self.post_form(&self.config.token_url, &params).await?;
        let status = response.status();
        if status.is_success() {
            let tokens =
                response.json::<TokenResponse>().await.map_err(|e| OAuthApiError::ResponseError(e.to_string()))?;
            debug!("Refreshed access token, valid for {}s", tokens.expires_in);
            Ok(tokens)
        } else {
            let message = response.text().await.map_err(|e| OAuthApiError::ResponseError(e.to_string()))?;
            Err(OAuthApiError::Rejected { status: status.as_u16(), message })
        }
    }
}
