use crate::error::AppError;
use crate::models::AUTH_ACCESS;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's identifier.
    pub sub: String,
    /// Scope of the token. Always `"auth"`.
    pub access: String,
}

/// Issues and verifies signed session tokens.
///
/// Tokens carry no expiry claim: a session stays valid until its token is
/// removed from the user record. The service never touches storage.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service signing with HS256 and the given secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs `{sub: user_id, access: "auth"}`.
    ///
    /// The output is a pure function of the payload and the secret, so issuing
    /// twice for the same user yields the same string.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            access: AUTH_ACCESS.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::StoreError(format!("Failed to sign token: {}", e)))
    }

    /// Checks the signature and decodes the claims.
    ///
    /// Returns `AppError::Unauthorized` for malformed or tampered tokens and for
    /// tokens issued with any scope other than `"auth"`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("rejected session token: {}", e);
                AppError::Unauthorized
            })?;

        if claims.access != AUTH_ACCESS {
            log::debug!("rejected session token with scope {:?}", claims.access);
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }

    /// Verifies the token and parses its subject as a user identifier.
    pub fn verify_subject(&self, token: &str) -> Result<Uuid, AppError> {
        let claims = self.verify(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)
    }
}
