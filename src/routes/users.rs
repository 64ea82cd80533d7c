use crate::{
    auth::{AuthenticatedUser, LoginRequest, AUTH_HEADER},
    error::AppError,
    models::{parse_record_id, UserInput},
    state::AppState,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Creates the account, opens a first session and returns the public user with
/// the session token in the `x-auth` header.
#[post("")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    let mut user = state.users.create(register_data.into_inner()).await?;
    let token = state.users.add_token(&mut user).await?;

    Ok(HttpResponse::Ok()
        .insert_header((AUTH_HEADER, token))
        .json(user.to_public()))
}

/// Login user
///
/// Any failure, whether unknown email or wrong password, is an empty `400`
/// and leaves the user's sessions untouched.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let LoginRequest { email, password } = login_data.into_inner();
    let mut user = state.users.find_by_credentials(&email, &password).await?;
    let token = state.users.add_token(&mut user).await?;

    Ok(HttpResponse::Ok()
        .insert_header((AUTH_HEADER, token))
        .json(user.to_public()))
}

/// Returns the user that owns the presented session token.
#[get("")]
pub async fn me(auth: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(auth.user.to_public())
}

/// Logout: removes the presented session token from the user.
#[delete("/token")]
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let AuthenticatedUser { mut user, token } = auth;
    state.users.remove_token(&mut user, &token).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Fetches a user's public fields as `{"user": {...}}`.
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_record_id(&user_id)?;

    match state.users.find_by_id(id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(json!({ "user": user.to_public() }))),
        None => Err(AppError::NotFound("User not found".into())),
    }
}
