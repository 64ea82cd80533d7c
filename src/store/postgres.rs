use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{StoreError, TodoRepository, UserRepository};
use crate::models::{AuthToken, NewUser, Todo, TodoChanges, User};

const USER_COLUMNS: &str = "id, name, email, password, tokens";
const TODO_COLUMNS: &str = "id, text, completed, completed_at";

/// Connects to PostgreSQL and applies the bundled migrations.
pub async fn connect(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))?;

    Ok(pool)
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password: String,
    tokens: Json<Vec<AuthToken>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_stored(row.id, row.name, row.email, row.password, row.tokens.0)
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_token(&self, id: Uuid, token: &str) -> Result<Option<User>, StoreError> {
        // jsonb containment: the tokens array holds an element equal to this one.
        let needle = Json(vec![AuthToken::auth(token)]);
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND tokens @> $2",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(needle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn replace(&self, user: &User) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password = $4, tokens = $5 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Json(&user.tokens))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_many(&self, users: Vec<User>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for user in users {
            sqlx::query(
                "INSERT INTO users (id, name, email, password, tokens) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(Json(&user.tokens))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn insert(&self, text: &str) -> Result<Todo, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (text) VALUES ($1) RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos ORDER BY created_at",
            TODO_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1",
            TODO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn update(&self, id: Uuid, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET text = COALESCE($2, text), completed = $3, completed_at = $4 \
             WHERE id = $1 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(changes.text)
        .bind(changes.completed)
        .bind(changes.completed_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = $1 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn insert_many(&self, todos: Vec<Todo>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for todo in todos {
            sqlx::query(
                "INSERT INTO todos (id, text, completed, completed_at) VALUES ($1, $2, $3, $4)",
            )
            .bind(todo.id)
            .bind(todo.text)
            .bind(todo.completed)
            .bind(todo.completed_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM todos").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pool() -> PgPool {
        dotenv::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
        connect(&url).await.unwrap()
    }

    #[ignore]
    #[actix_rt::test]
    async fn test_unique_email_and_token_lookup() {
        let repo = PgUserRepository::new(pool().await);
        let email = format!("{}@pg.example.com", Uuid::new_v4().simple());

        let mut user = repo
            .insert(NewUser {
                name: "pg".to_string(),
                email: email.clone(),
                password_hash: "$2b$04$placeholder".to_string(),
            })
            .await
            .unwrap();

        let duplicate = repo
            .insert(NewUser {
                name: "pg".to_string(),
                email: email.clone(),
                password_hash: "$2b$04$placeholder".to_string(),
            })
            .await;
        assert_eq!(duplicate.unwrap_err(), StoreError::DuplicateKey("email".into()));

        user.tokens.push(AuthToken::auth("signed-token"));
        assert!(repo.replace(&user).await.unwrap());

        let found = repo.find_by_token(user.id, "signed-token").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(repo.find_by_token(user.id, "other").await.unwrap().is_none());

        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(&email)
            .execute(&repo.pool)
            .await
            .unwrap();
    }

    #[ignore]
    #[actix_rt::test]
    async fn test_todo_update_and_delete() {
        let repo = PgTodoRepository::new(pool().await);
        let todo = repo.insert("pg todo").await.unwrap();
        assert!(!todo.completed);

        let updated = repo
            .update(
                todo.id,
                TodoChanges {
                    text: None,
                    completed: true,
                    completed_at: Some(123),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "pg todo");
        assert_eq!(updated.completed_at, Some(123));

        assert_eq!(repo.delete(todo.id).await.unwrap().map(|t| t.id), Some(todo.id));
        assert!(repo.delete(todo.id).await.unwrap().is_none());
    }
}
