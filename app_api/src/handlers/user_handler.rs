use crate::AppState;
use crate::middleware::AuthUser;
use crate::result::{ApiResponse, result_data};
use actix_web::{HttpResponse, get, web};
use biz_service::entitys::user_entity::PublicUser;
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(recommended_users).service(my_friends);
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    summary = "Onboarded users who are neither the caller nor a friend",
    responses(
        (status = 200, description = "Recommended users", body = ApiResponse<Vec<PublicUser>>),
        (status = 401, description = "No or invalid session")
    )
)]
#[get("")]
pub async fn recommended_users(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, AppError> {
    let users = state.services.users.recommended_users(auth.id()).await?;
    Ok(HttpResponse::Ok().json(result_data("Recommended users fetched successfully", users)))
}

#[utoipa::path(
    get,
    path = "/api/users/friends",
    tag = "Users",
    summary = "The caller's friends",
    responses(
        (status = 200, description = "Friends", body = ApiResponse<Vec<PublicUser>>),
        (status = 404, description = "User not found")
    )
)]
#[get("/friends")]
pub async fn my_friends(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, AppError> {
    let friends = state.services.users.my_friends(auth.id()).await?;
    Ok(HttpResponse::Ok().json(result_data("Friends fetched successfully", friends)))
}
