use thiserror::Error;

#[derive(Debug, Error)]
pub enum MomoApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Token exchange failed: {0}")]
    Auth(String),
    #[error("Could not reach the provider: {0}")]
    Transport(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Request failed. Error {status}. {message}")]
    RequestFailed { status: u16, message: String },
}
