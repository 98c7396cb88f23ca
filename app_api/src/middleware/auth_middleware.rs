use crate::AppState;
use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header,
    web,
};
use biz_service::biz_service::auth_service::MSG_NO_TOKEN;
use biz_service::entitys::user_entity::UserEntity;
use common::errors::AppError;
use futures_util::future::{LocalBoxFuture, Ready, ok, ready};
use log::debug;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Paths under the guarded scope that do not need a session.
const PUBLIC_PATHS: [&str; 3] = ["/api/auth/signup", "/api/auth/login", "/api/auth/logout"];

/// The authenticated caller, placed in request extensions by [`AuthMiddleware`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserEntity,
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<AuthUser>().cloned().ok_or_else(|| AppError::unauthorized(MSG_NO_TOKEN)))
    }
}

/// Session token from `Authorization: Bearer ...`, falling back to the session cookie.
pub fn session_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    bearer.or_else(|| req.cookie(cookie_name).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Authentication Middleware
pub struct AuthMiddleware {
    pub state: web::Data<AppState>,
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService { service: Rc::new(service), state: self.state.clone() })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    state: web::Data<AppState>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let state = self.state.clone();

        if PUBLIC_PATHS.contains(&req.path()) {
            return Box::pin(async move {
                let res = srv.call(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        Box::pin(async move {
            let token = session_token(req.request(), &state.session.cookie_name);
            match state.services.auth.authenticate(token.as_deref()).await {
                Ok(user) => {
                    debug!("{} {} as {}", req.method(), req.path(), user.id);
                    req.extensions_mut().insert(AuthUser { user });
                    let res = srv.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.into_response(err.error_response().map_into_right_body())),
            }
        })
    }
}
