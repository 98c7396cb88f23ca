use crate::handlers::{auth_handler, common_handler, friend_handler, user_handler};
use actix_web::{HttpResponse, Responder, get, web};
use common::errors::AppError;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        common_handler::status,
        // auth
        auth_handler::signup,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        auth_handler::onboarding,
        // users
        user_handler::recommended_users,
        user_handler::my_friends,
        // friend requests
        friend_handler::send_friend_request,
        friend_handler::accept_friend_request,
        friend_handler::friend_requests,
        friend_handler::outgoing_friend_requests,
    ),
    tags(
        (name = "Common", description = "Service status"),
        (name = "Auth", description = "Accounts and sessions"),
        (name = "Users", description = "Recommendations and friends"),
        (name = "Friend requests", description = "Friend-request workflow")
    )
)]
pub struct ApiDoc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}

#[get("/api-doc/openapi.json")]
async fn openapi_json() -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().content_type("application/json").body(ApiDoc::openapi().to_json()?))
}
