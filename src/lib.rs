#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Domain models, credential hashing, session tokens, the storage adapters,"]
#![doc = "the authentication middleware and the HTTP routes of the todo API."]
#![doc = "The binary (`main.rs`) only reads configuration, builds an `AppState` and"]
#![doc = "serves `routes::config(state)`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
