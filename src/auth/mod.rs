pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{PasswordHasher, DEFAULT_HASH_COST};
pub use token::{Claims, TokenService};

/// Request and response header carrying the session token.
pub const AUTH_HEADER: &str = "x-auth";

/// Represents the payload for a user login request.
///
/// No format checks happen here: any mismatch, including a malformed email,
/// is reported as the same opaque credentials failure.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
