pub mod health;
pub mod todos;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::state::AppState;

/// Registers the application state and every route.
///
/// `/users/me` is registered ahead of `/users/{id}` so that `me` is never
/// treated as an identifier.
pub fn config(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .service(health::health)
            .service(
                web::scope("/todos")
                    .service(todos::get_todos)
                    .service(todos::create_todo)
                    .service(todos::get_todo)
                    .service(todos::update_todo)
                    .service(todos::delete_todo),
            )
            .service(
                web::scope("/users/me")
                    .wrap(AuthMiddleware)
                    .service(users::me)
                    .service(users::logout),
            )
            .service(
                web::scope("/users")
                    .service(users::register)
                    .service(users::login)
                    .service(users::get_user),
            );
    }
}
