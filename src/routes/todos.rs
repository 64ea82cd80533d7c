use crate::{
    error::AppError,
    models::{parse_record_id, TodoInput, TodoPatch},
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;

/// Creates a new todo.
///
/// ## Request Body:
/// `{"text": "..."}`. Any other field is ignored.
///
/// ## Responses:
/// - `200 OK`: the created todo (`completed: false`, `completedAt: null`).
/// - `400 Bad Request`: `text` missing or blank, or a store failure.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = state.todos.create(todo_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Lists every todo as `{"todos": [...]}`.
///
/// An empty collection is still a `200` with an empty array.
#[get("")]
pub async fn get_todos(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let todos = state.todos.list_all().await?;
    Ok(HttpResponse::Ok().json(json!({ "todos": todos })))
}

/// Fetches one todo as `{"todo": {...}}`.
///
/// ## Responses:
/// - `200 OK`
/// - `400 Bad Request`: the id is not a well-formed identifier.
/// - `404 Not Found`
#[get("/{id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_record_id(&todo_id)?;

    match state.todos.find_by_id(id).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("Todo not found".into())),
    }
}

/// Deletes one todo and returns it as `{"todo": {...}}`.
#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_record_id(&todo_id)?;

    match state.todos.delete_by_id(id).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("Todo not found".into())),
    }
}

/// Updates `text` and/or `completed`.
///
/// Setting `completed: true` stamps `completedAt` with the current time in
/// milliseconds. Any other `completed` value, omitting it, or sending no body
/// at all marks the todo as not completed and clears `completedAt`.
#[patch("/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<String>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let id = parse_record_id(&todo_id)?;
    let patch = TodoPatch::from_body(&body)?;

    match state.todos.update_by_id(id, patch).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("Todo not found".into())),
    }
}
