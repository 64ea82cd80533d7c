use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness probe. Does not touch the store.
///
/// `timestamp` is in milliseconds since the epoch, the same clock as a todo's
/// `completedAt`.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().timestamp_millis()
    }))
}

#[cfg(test)]
mod tests {
    use crate::auth::{PasswordHasher, TokenService};
    use crate::routes;
    use crate::state::AppState;
    use crate::store::memory::{MemoryTodoRepository, MemoryUserRepository};
    use actix_web::{test, web, App};
    use chrono::Utc;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_health_is_public_and_reports_millis() {
        let state = web::Data::new(AppState::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryTodoRepository::new()),
            PasswordHasher::new(4),
            TokenService::new(b"health-secret"),
        ));
        let app = test::init_service(App::new().configure(routes::config(state))).await;

        let before = Utc::now().timestamp_millis();
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert!(resp.headers().get(crate::auth::AUTH_HEADER).is_none());

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "todo-api");
        let timestamp = json["timestamp"].as_i64().unwrap();
        assert!(timestamp >= before && timestamp <= Utc::now().timestamp_millis());
    }
}
