use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// A todo item as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Identifier assigned by the store on creation.
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    /// Milliseconds since the epoch. Only set while `completed` is true.
    pub completed_at: Option<i64>,
}

/// Body of `POST /todos`.
///
/// Any field other than `text` is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TodoInput {
    /// Required, non-empty after trimming.
    #[serde(default)]
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

impl TodoInput {
    /// Trims `text` and validates the result.
    pub fn normalized(mut self) -> Result<Self, validator::ValidationErrors> {
        self.text = self.text.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

/// Body of `PATCH /todos/{id}`. Only `text` and `completed` are honoured.
///
/// `completed` is kept as raw JSON: only a literal `true` completes the todo,
/// any other value (a string, a number, `null`) counts as not completed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TodoPatch {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<Value>,
}

/// The fully resolved set of fields an update writes.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub completed: bool,
    pub completed_at: Option<i64>,
}

impl TodoPatch {
    /// Parses a raw request body. An empty body is the empty patch, which
    /// resets the todo to not completed.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Json deserialize error: {}", e)))
    }

    /// Resolves the patch against the completion rules.
    ///
    /// `completed: true` stamps `completed_at` with `now_ms`. Anything else
    /// (false, absent or not a boolean) forces `completed = false` and clears `completed_at`.
    pub fn resolve(self, now_ms: i64) -> Result<TodoChanges, validator::ValidationErrors> {
        let text = self.text.map(|t| t.trim().to_string());
        let patch = TodoPatch { text, ..self };
        patch.validate()?;

        let (completed, completed_at) = match patch.completed {
            Some(Value::Bool(true)) => (true, Some(now_ms)),
            _ => (false, None),
        };

        Ok(TodoChanges {
            text: patch.text,
            completed,
            completed_at,
        })
    }

    /// Resolves the patch using the current wall clock.
    pub fn resolve_now(self) -> Result<TodoChanges, validator::ValidationErrors> {
        self.resolve(Utc::now().timestamp_millis())
    }
}
