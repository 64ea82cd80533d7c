use std::sync::Arc;
use uuid::Uuid;

use super::UserRepository;
use crate::auth::{PasswordHasher, TokenService};
use crate::error::AppError;
use crate::models::{AuthToken, NewUser, User, UserInput};

/// Domain-level access to users: validation, password hashing and session tokens
/// on top of a [`UserRepository`].
#[derive(Clone)]
pub struct UserStore {
    repo: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl UserStore {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    pub fn repository(&self) -> &Arc<dyn UserRepository> {
        &self.repo
    }

    /// Validates and persists a new user.
    ///
    /// The password is hashed first; the insert only runs once hashing has
    /// succeeded. A taken email surfaces as a validation error on `email`.
    pub async fn create(&self, input: UserInput) -> Result<User, AppError> {
        let input = input.normalized()?;
        let password_hash = self.hasher.hash(&input.password)?;

        let user = self
            .repo
            .insert(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Persists changes to an existing user, hashing the password only if
    /// [`User::set_password`] was called since the last save.
    pub async fn save(&self, user: &mut User) -> Result<(), AppError> {
        let new_hash = match user.pending_password() {
            Some(plaintext) if plaintext.chars().count() < 6 => {
                return Err(AppError::invalid_field(
                    "password",
                    "length",
                    "password must be at least 6 characters",
                ));
            }
            Some(plaintext) => Some(self.hasher.hash(plaintext)?),
            None => None,
        };

        let mut staged = user.clone();
        if let Some(hash) = new_hash {
            staged.password_hash = hash;
        }

        if !self.repo.replace(&staged).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        staged.clear_pending_password();
        *user = staged;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Looks a user up by email and checks the password.
    ///
    /// An unknown email and a wrong password both yield
    /// `AppError::InvalidCredentials`.
    pub async fn find_by_credentials(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if self.hasher.verify(password, &user.password_hash) {
            Ok(user)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    /// Resolves a session token to its user.
    ///
    /// The signature must verify and the token must still be listed on the
    /// user it names; a revoked token fails even though it is correctly signed.
    pub async fn find_by_token(&self, token: &str) -> Result<User, AppError> {
        let user_id = self.tokens.verify_subject(token)?;

        self.repo
            .find_by_token(user_id, token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Issues a session token for `user`, records it and returns it.
    ///
    /// Tokens carry no issue time, so every call for the same user signs the
    /// same string and appends another identical entry. `remove_token` drops
    /// all of them at once.
    pub async fn add_token(&self, user: &mut User) -> Result<String, AppError> {
        let token = self.tokens.issue(user.id)?;
        user.tokens.push(AuthToken::auth(token.clone()));
        self.save(user).await?;
        Ok(token)
    }

    /// Drops every entry matching `token` from the user's sessions.
    /// Removing a token that is not present changes nothing.
    pub async fn remove_token(&self, user: &mut User, token: &str) -> Result<(), AppError> {
        let before = user.tokens.len();
        user.tokens.retain(|t| t.token != token);
        if user.tokens.len() == before {
            return Ok(());
        }
        self.save(user).await
    }
}
