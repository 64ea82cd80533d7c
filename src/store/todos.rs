use std::sync::Arc;
use uuid::Uuid;

use super::TodoRepository;
use crate::error::AppError;
use crate::models::{Todo, TodoInput, TodoPatch};

/// Domain-level access to todos on top of a [`TodoRepository`].
#[derive(Clone)]
pub struct TodoStore {
    repo: Arc<dyn TodoRepository>,
}

impl TodoStore {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<dyn TodoRepository> {
        &self.repo
    }

    pub async fn create(&self, input: TodoInput) -> Result<Todo, AppError> {
        let input = input.normalized()?;
        Ok(self.repo.insert(&input.text).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.repo.list().await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Applies a `{text, completed}` patch. Completing stamps `completed_at`;
    /// anything else resets the todo to not completed with no timestamp.
    pub async fn update_by_id(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, AppError> {
        let changes = patch.resolve_now()?;
        Ok(self.repo.update(id, changes).await?)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        Ok(self.repo.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryTodoRepository;
    use serde_json::Value;

    fn store() -> TodoStore {
        TodoStore::new(Arc::new(MemoryTodoRepository::new()))
    }

    #[actix_rt::test]
    async fn test_create_defaults() {
        let todo = store()
            .create(TodoInput {
                text: "Buy milk".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(todo.text, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
    }

    #[actix_rt::test]
    async fn test_create_requires_text() {
        let err = store().create(TodoInput::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[actix_rt::test]
    async fn test_uncompleting_clears_timestamp() {
        let store = store();
        let todo = store
            .create(TodoInput {
                text: "Walk the dog".to_string(),
            })
            .await
            .unwrap();

        let done = store
            .update_by_id(
                todo.id,
                TodoPatch {
                    text: None,
                    completed: Some(Value::Bool(true)),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        let undone = store
            .update_by_id(
                todo.id,
                TodoPatch {
                    text: None,
                    completed: Some(Value::Bool(false)),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.completed_at, None);
        assert_eq!(undone.text, "Walk the dog");
    }

    #[actix_rt::test]
    async fn test_missing_ids_yield_none() {
        let store = store();
        let id = Uuid::new_v4();
        assert!(store.find_by_id(id).await.unwrap().is_none());
        assert!(store.delete_by_id(id).await.unwrap().is_none());
        assert!(store
            .update_by_id(id, TodoPatch::default())
            .await
            .unwrap()
            .is_none());
    }
}
