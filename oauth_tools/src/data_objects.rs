use std::fmt::{self, Debug};

use lwg_common::mask_secret;
use serde::Deserialize;

/// The token service's response to a refresh grant.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// The platform may rotate the refresh token on every grant. When it is omitted, the previous refresh token
    /// remains valid and should be kept.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime, in seconds from the moment the response was issued.
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &mask_secret(&self.access_token))
            .field("refresh_token", &self.refresh_token.as_deref().map(mask_secret))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::TokenResponse;

    #[test]
    fn deserialize_full_response() {
        let body = r#"{
            "token_type": "bearer",
            "access_token": "eyJlbmMiOiJBMTI4Q0JDLUhTMjU2In0.synthetic",
            "expires_in": 3600,
            "refresh_token": "AB11762387perf44556621",
            "x_refresh_token_expires_in": 8726400
        }"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.refresh_token.as_deref(), Some("AB11762387perf44556621"));
        assert_eq!(response.token_type.as_deref(), Some("bearer"));
    }

    #[test]
    fn refresh_token_rotation_is_optional() {
        let body = r#"{"access_token": "tok", "expires_in": 600}"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        assert!(response.refresh_token.is_none());
        // Masked rendering never exposes the token itself.
        assert!(!format!("{response:?}").contains("\"tok\""));
    }
}
