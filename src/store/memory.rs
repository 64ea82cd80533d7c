//! In-process repositories with the same contract as the PostgreSQL ones.
//!
//! Selected with `DATABASE_URL=memory://` and used throughout the test suite.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TodoRepository, UserRepository};
use crate::models::{NewUser, Todo, TodoChanges, User};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &[User], email: &str, except: Option<Uuid>) -> bool {
    users
        .iter()
        .any(|u| u.email == email && Some(u.id) != except)
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(StoreError::DuplicateKey("email".to_string()));
        }

        let stored = User::from_stored(
            Uuid::new_v4(),
            user.name,
            user.email,
            user.password_hash,
            Vec::new(),
        );
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_token(&self, id: Uuid, token: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.id == id && u.has_token(token))
            .cloned())
    }

    async fn replace(&self, user: &User) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, Some(user.id)) {
            return Err(StoreError::DuplicateKey("email".to_string()));
        }

        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = User::from_stored(
                    user.id,
                    user.name.clone(),
                    user.email.clone(),
                    user.password_hash.clone(),
                    user.tokens.clone(),
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_many(&self, new_users: Vec<User>) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        for user in &new_users {
            if users.iter().any(|u| u.id == user.id) {
                return Err(StoreError::DuplicateKey("_id".to_string()));
            }
            if email_taken(&users, &user.email, None) {
                return Err(StoreError::DuplicateKey("email".to_string()));
            }
        }
        users.extend(new_users);
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut users = self.users.write().await;
        let count = users.len() as u64;
        users.clear();
        Ok(count)
    }
}

#[derive(Default)]
pub struct MemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn insert(&self, text: &str) -> Result<Todo, StoreError> {
        let todo = Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            completed_at: None,
        };
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(text) = changes.text {
            todo.text = text;
        }
        todo.completed = changes.completed;
        todo.completed_at = changes.completed_at;
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter()
            .position(|t| t.id == id)
            .map(|index| todos.remove(index)))
    }

    async fn insert_many(&self, new_todos: Vec<Todo>) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        if new_todos
            .iter()
            .any(|new| todos.iter().any(|t| t.id == new.id))
        {
            return Err(StoreError::DuplicateKey("_id".to_string()));
        }
        todos.extend(new_todos);
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut todos = self.todos.write().await;
        let count = todos.len() as u64;
        todos.clear();
        Ok(count)
    }
}
