mod api;
mod config;
mod error;
mod token;

mod data_objects;

pub use api::{MomoApi, SUBSCRIPTION_KEY_HEADER};
pub use config::{MomoConfig, DEFAULT_MOMO_BASE_URL};
pub use data_objects::{
    ApiUserInfo,
    Party,
    PartyIdType,
    PaymentParams,
    PaymentStatus,
    PaymentStatusResponse,
    StatusReason,
    TokenResponse,
};
pub use error::MomoApiError;
pub use token::TokenManager;
