#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;
use todo_api::auth::{PasswordHasher, TokenService};
use todo_api::models::{AuthToken, Todo, User};
use todo_api::store::memory::{MemoryTodoRepository, MemoryUserRepository};
use todo_api::AppState;
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// A seeded account and the plaintext needed to log in as it.
pub struct SeedUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub token: Option<String>,
}

pub struct Seed {
    pub users: Vec<SeedUser>,
    pub todos: Vec<Todo>,
}

pub fn token_service() -> TokenService {
    TokenService::new(TEST_SECRET)
}

/// Fresh in-memory state. Bcrypt runs at its minimum cost to keep tests fast.
pub fn empty_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Arc::new(MemoryUserRepository::new()),
        Arc::new(MemoryTodoRepository::new()),
        PasswordHasher::new(4),
        token_service(),
    ))
}

/// Two users (the first with a live session token) and two todos (the second
/// uncompleted but carrying a stale `completedAt`).
pub async fn seeded_state() -> (web::Data<AppState>, Seed) {
    let state = empty_state();
    let hasher = PasswordHasher::new(4);

    let user_one_id = Uuid::new_v4();
    let user_one_token = token_service().issue(user_one_id).unwrap();
    let users = vec![
        SeedUser {
            id: user_one_id,
            email: "user_one@test.com".to_string(),
            password: "user_one_pass".to_string(),
            token: Some(user_one_token),
        },
        SeedUser {
            id: Uuid::new_v4(),
            email: "user_two@test.com".to_string(),
            password: "user_two_pass".to_string(),
            token: None,
        },
    ];

    let stored_users = users
        .iter()
        .map(|seed| {
            User::from_stored(
                seed.id,
                seed.email.split('@').next().unwrap().to_string(),
                seed.email.clone(),
                hasher.hash(&seed.password).unwrap(),
                seed.token.iter().map(AuthToken::auth).collect(),
            )
        })
        .collect();

    let todos = vec![
        Todo {
            id: Uuid::new_v4(),
            text: "First todo".to_string(),
            completed: false,
            completed_at: None,
        },
        Todo {
            id: Uuid::new_v4(),
            text: "Second todo".to_string(),
            completed: false,
            completed_at: Some(100),
        },
    ];

    let user_repo = state.users.repository();
    user_repo.delete_all().await.unwrap();
    user_repo.insert_many(stored_users).await.unwrap();

    let todo_repo = state.todos.repository();
    todo_repo.delete_all().await.unwrap();
    todo_repo.insert_many(todos.clone()).await.unwrap();

    (state, Seed { users, todos })
}
