use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::Config;
use crate::store::memory::{MemoryTodoRepository, MemoryUserRepository};
use crate::store::postgres::{self, PgTodoRepository, PgUserRepository};
use crate::store::{StoreError, TodoRepository, TodoStore, UserRepository, UserStore};

/// Everything a request handler needs. Built once at startup and handed to
/// `routes::config`; cloned per worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub todos: TodoStore,
}

impl AppState {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        todo_repo: Arc<dyn TodoRepository>,
        hasher: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            users: UserStore::new(user_repo, hasher, tokens),
            todos: TodoStore::new(todo_repo),
        }
    }

    /// Connects the configured backend and assembles the stores.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let tokens = TokenService::new(config.jwt_secret.as_bytes());

        if config.uses_memory_store() {
            log::warn!("using the in-memory store; data is lost on shutdown");
            return Ok(Self::new(
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemoryTodoRepository::new()),
                hasher,
                tokens,
            ));
        }

        let pool = postgres::connect(&config.database_url).await?;
        Ok(Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgTodoRepository::new(pool)),
            hasher,
            tokens,
        ))
    }
}
