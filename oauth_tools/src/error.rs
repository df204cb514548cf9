use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OAuthApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("The token service could not be reached: {0}")]
    Unreachable(String),
    #[error("Invalid token service response: {0}")]
    ResponseError(String),
    #[error("Request failed. Error {status}. {message}")]
    Rejected { status: u16, message: String },
}
