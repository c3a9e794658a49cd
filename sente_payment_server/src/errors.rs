use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use sente_payment_engine::PaymentFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The user id header is missing or malformed")]
    MissingUserId,
    #[error("{0}")]
    PaymentFlow(#[from] PaymentFlowError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingUserId => StatusCode::UNAUTHORIZED,
            Self::PaymentFlow(e) => match e {
                PaymentFlowError::ValidationError(_) => StatusCode::BAD_REQUEST,
                PaymentFlowError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
                PaymentFlowError::RecipientNotFound(_) => StatusCode::NOT_FOUND,
                PaymentFlowError::WalletNotFound(_) => StatusCode::NOT_FOUND,
                PaymentFlowError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
                PaymentFlowError::AuthError(_) => StatusCode::BAD_GATEWAY,
                PaymentFlowError::ProviderRejected { .. } => StatusCode::BAD_GATEWAY,
                PaymentFlowError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                PaymentFlowError::OrchestrationTimeout => StatusCode::GATEWAY_TIMEOUT,
                PaymentFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
