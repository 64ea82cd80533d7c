use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Scope value carried by every session token.
pub const AUTH_ACCESS: &str = "auth";

/// One active session: a signed token and the scope it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access: String,
    pub token: String,
}

impl AuthToken {
    pub fn auth(token: impl Into<String>) -> Self {
        Self {
            access: AUTH_ACCESS.to_string(),
            token: token.into(),
        }
    }
}

/// A persisted user account.
///
/// Has no `Serialize` impl: the only way to put a user on the
/// wire is [`User::to_public`], which drops the password hash and the tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Bcrypt output. Never plaintext once the user has been persisted.
    pub password_hash: String,
    pub tokens: Vec<AuthToken>,
    // Plaintext awaiting hashing on the next save.
    pending_password: Option<String>,
}

impl User {
    /// Rebuilds a user from its stored representation.
    pub fn from_stored(
        id: Uuid,
        name: String,
        email: String,
        password_hash: String,
        tokens: Vec<AuthToken>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            tokens,
            pending_password: None,
        }
    }

    /// Replaces the password. The new value is hashed by `UserStore::save`;
    /// until then the stored hash is left untouched.
    pub fn set_password(&mut self, plaintext: impl Into<String>) {
        self.pending_password = Some(plaintext.into());
    }

    pub fn password_modified(&self) -> bool {
        self.pending_password.is_some()
    }

    pub(crate) fn pending_password(&self) -> Option<&str> {
        self.pending_password.as_deref()
    }

    pub(crate) fn clear_pending_password(&mut self) {
        self.pending_password = None;
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| t.access == AUTH_ACCESS && t.token == token)
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// The only user shape ever sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
}

/// Body of `POST /users`. Fields other than these three are ignored.
///
/// Missing fields deserialize to empty strings so that validation can report
/// every violated constraint at once.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "is not a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl UserInput {
    /// Trims `email` and validates all fields.
    pub fn normalized(mut self) -> Result<Self, validator::ValidationErrors> {
        self.email = self.email.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

/// Row handed to the repository when a user is first inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
