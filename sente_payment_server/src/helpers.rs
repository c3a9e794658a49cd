use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::errors::ServerError;

pub const USER_ID_HEADER: &str = "x-spg-user-id";

/// The calling user, as asserted by the session layer in front of this service.
///
/// That layer terminates authentication and injects the id; a request reaching the service
/// without the header is rejected outright.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i64);

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .map(AuthenticatedUser)
            .ok_or(ServerError::MissingUserId);
        ready(user)
    }
}
