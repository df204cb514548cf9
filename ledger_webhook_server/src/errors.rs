use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;

use crate::integrations::oauth::CredentialLifecycleError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Request origin is not on the whitelist.")]
    ForbiddenPeer,
    #[error("Credential lifecycle error. {0}")]
    CredentialLifecycle(#[from] CredentialLifecycleError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ForbiddenPeer => StatusCode::FORBIDDEN,
            Self::CredentialLifecycle(e) => match e {
                CredentialLifecycleError::CredentialNotFound(_) => StatusCode::NOT_FOUND,
                CredentialLifecycleError::ExternalRejected(_) => StatusCode::BAD_GATEWAY,
                CredentialLifecycleError::ExternalUnreachable(_) => StatusCode::GATEWAY_TIMEOUT,
                CredentialLifecycleError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
