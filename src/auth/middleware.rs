use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::{AuthenticatedUser, AUTH_HEADER};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the `x-auth` header to a user before the wrapped handlers run.
///
/// On success the user and the raw token are stored in the request extensions
/// as an [`AuthenticatedUser`]. A missing header, a bad signature or a revoked
/// token short-circuits with an empty 401 and the handler never executes.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get(AUTH_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let Some(token) = token else {
                log::debug!("no session header on {}", req.path());
                return Ok(unauthorized(req));
            };

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                log::error!("AppState missing from app data; was routes::config used?");
                return Ok(unauthorized(req));
            };

            let user = match state.users.find_by_token(&token).await {
                Ok(user) => user,
                Err(e) => {
                    log::debug!("session rejected on {}: {}", req.path(), e);
                    return Ok(unauthorized(req));
                }
            };

            req.extensions_mut().insert(AuthenticatedUser { user, token });
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

// Ends the request here with an empty 401; the wrapped service is never called.
fn unauthorized<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    req.into_response(AppError::Unauthorized.error_response())
        .map_into_right_body()
}
