//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can run into (schema violations, bad credentials, revoked
//! sessions, malformed identifiers, missing records, storage failures) is represented
//! here and translated into a status code and body at the route boundary.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can simply return
//! `Result<impl Responder, AppError>` and use `?`. `From` implementations cover
//! `validator::ValidationErrors` and the storage layer's `StoreError`.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::borrow::Cow;
use std::fmt;
use validator::{ValidationError, ValidationErrors};

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or revoked session token (HTTP 401, empty body).
    Unauthorized,
    /// Login with an unknown email or a wrong password (HTTP 400, empty body).
    /// Both cases produce the same response.
    InvalidCredentials,
    /// The request could not be understood, e.g. a malformed JSON body (HTTP 400).
    BadRequest(String),
    /// A path identifier that fails the identifier grammar (HTTP 400, empty body).
    MalformedId(String),
    /// A well-formed identifier with no matching record (HTTP 404, empty body).
    NotFound(String),
    /// One or more entity constraints were violated (HTTP 400).
    /// Carries every violated constraint, not just the first.
    ValidationError(ValidationErrors),
    /// The storage backend rejected or failed the operation (HTTP 400).
    /// The detail is logged, never sent to the client.
    StoreError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::MalformedId(id) => write!(f, "Malformed identifier: {}", id),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(errors) => write!(f, "Validation Error: {}", errors),
            AppError::StoreError(msg) => write!(f, "Store Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Builds a single-field validation failure, e.g. a duplicate email.
    pub fn invalid_field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Borrowed(message));

        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => HttpResponse::Unauthorized().finish(),
            AppError::InvalidCredentials => HttpResponse::BadRequest().finish(),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::MalformedId(_) => HttpResponse::BadRequest().finish(),
            AppError::NotFound(_) => HttpResponse::NotFound().finish(),
            AppError::ValidationError(errors) => HttpResponse::BadRequest().json(json!({
                "errors": errors
            })),
            AppError::StoreError(msg) => {
                log::error!("store error: {}", msg);
                HttpResponse::BadRequest().json(json!({
                    "error": "request could not be completed"
                }))
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::ValidationError(errors)
    }
}

/// Converts storage failures into `AppError`.
///
/// A unique-index violation on `email` is a schema violation from the caller's
/// point of view, so it becomes a `ValidationError` rather than a `StoreError`.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateKey(field) if field == "email" => {
                AppError::invalid_field("email", "unique", "email is already registered")
            }
            other => AppError::StoreError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_error_responses() {
        let response = AppError::Unauthorized.error_response();
        assert_eq!(response.status(), 401);

        let response = AppError::InvalidCredentials.error_response();
        assert_eq!(response.status(), 400);

        let response = AppError::MalformedId("123".into()).error_response();
        assert_eq!(response.status(), 400);

        let response = AppError::NotFound("Todo not found".into()).error_response();
        assert_eq!(response.status(), 404);

        let response = AppError::StoreError("connection reset".into()).error_response();
        assert_eq!(response.status(), 400);
    }

    #[test]
    fn test_auth_failures_have_empty_bodies() {
        for error in [AppError::Unauthorized, AppError::InvalidCredentials] {
            let body = error.error_response().into_body();
            assert_eq!(body.size(), actix_web::body::BodySize::Sized(0));
        }
    }

    #[test]
    fn test_duplicate_email_becomes_validation_error() {
        match AppError::from(StoreError::DuplicateKey("email".into())) {
            AppError::ValidationError(errors) => {
                let fields = errors.field_errors();
                assert_eq!(fields["email"][0].code, "unique");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_backend_failure_stays_store_error() {
        let error = AppError::from(StoreError::Backend("pool timed out".into()));
        assert!(matches!(error, AppError::StoreError(msg) if msg.contains("pool timed out")));
    }
}
