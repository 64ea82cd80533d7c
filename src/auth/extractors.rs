use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The user resolved by `AuthMiddleware`, together with the raw token that
/// authenticated the request.
///
/// Only usable on routes wrapped by `AuthMiddleware`; anywhere else the
/// extractor fails with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(auth) => ready(Ok(auth)),
            None => ready(Err(AppError::Unauthorized.into())),
        }
    }
}
