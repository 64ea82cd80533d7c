//! Persistence for users and todos.
//!
//! The repositories are thin ports over the document store: they know how to
//! read and write records and enforce the unique-email index, nothing more.
//! Domain rules (validation, password hashing, token bookkeeping, completion
//! timestamps) live in the [`UserStore`] and [`TodoStore`] adapters on top.

pub mod memory;
pub mod postgres;
pub mod todos;
pub mod users;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{NewUser, Todo, TodoChanges, User};

pub use todos::TodoStore;
pub use users::UserStore;

/// Failure reported by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique index rejected the write. Carries the indexed field name.
    DuplicateKey(String),
    /// Anything else: connection loss, rejected query, corrupt record.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::DuplicateKey(field) => write!(f, "duplicate value for unique field {}", field),
            StoreError::Backend(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        if let Some(db_err) = error.as_database_error() {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some("users_email_key") => "email",
                    _ => "_id",
                };
                return StoreError::DuplicateKey(field.to_string());
            }
        }
        StoreError::Backend(error.to_string())
    }
}

/// Port over the user collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user and returns it with its store-assigned id.
    /// Fails with `DuplicateKey("email")` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Finds the user `id` only if it holds `token` with the `"auth"` scope.
    async fn find_by_token(&self, id: Uuid, token: &str) -> Result<Option<User>, StoreError>;

    /// Overwrites name, email, password hash and tokens of an existing user.
    /// Returns `false` when no user with that id exists.
    async fn replace(&self, user: &User) -> Result<bool, StoreError>;

    /// Bulk insert with caller-chosen ids. Used for seeding.
    async fn insert_many(&self, users: Vec<User>) -> Result<(), StoreError>;

    /// Removes every user, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

/// Port over the todo collection.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Inserts a new, uncompleted todo and returns it with its store-assigned id.
    async fn insert(&self, text: &str) -> Result<Todo, StoreError>;

    /// All todos in insertion order.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// Applies `changes` and returns the updated todo, or `None` if absent.
    async fn update(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError>;

    /// Deletes and returns the todo, or `None` if absent.
    async fn delete(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// Bulk insert with caller-chosen ids. Used for seeding.
    async fn insert_many(&self, todos: Vec<Todo>) -> Result<(), StoreError>;

    /// Removes every todo, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}
