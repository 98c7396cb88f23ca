use crate::AppState;
use crate::middleware::AuthUser;
use crate::result::{ApiResponse, result_data};
use actix_web::{HttpResponse, get, post, put, web};
use biz_service::entitys::friend_request_entity::{FriendRequestEntity, IncomingRequests, OutgoingRequestView};
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(send_friend_request)
        .service(accept_friend_request)
        .service(friend_requests)
        .service(outgoing_friend_requests);
}

#[utoipa::path(
    post,
    path = "/api/users/friend-request/{id}",
    tag = "Friend requests",
    summary = "Send a friend request to user `id`",
    params(("id" = String, Path, description = "Recipient user id")),
    responses(
        (status = 201, description = "Request created", body = ApiResponse<FriendRequestEntity>),
        (status = 400, description = "Self request, already friends, or already sent"),
        (status = 404, description = "Recipient not found")
    )
)]
#[post("/friend-request/{id}")]
pub async fn send_friend_request(state: web::Data<AppState>, auth: AuthUser, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let recipient = path.into_inner();
    let request = state.services.friends.send_friend_request(auth.id(), &recipient).await?;
    Ok(HttpResponse::Created().json(result_data("Friend request sent", request)))
}

#[utoipa::path(
    put,
    path = "/api/users/friend-request/{id}/accept",
    tag = "Friend requests",
    summary = "Accept friend request `id`",
    params(("id" = String, Path, description = "Friend request id")),
    responses(
        (status = 200, description = "Request accepted", body = ApiResponse<FriendRequestEntity>),
        (status = 403, description = "Caller is not the recipient"),
        (status = 404, description = "Friend request not found")
    )
)]
#[put("/friend-request/{id}/accept")]
pub async fn accept_friend_request(state: web::Data<AppState>, auth: AuthUser, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();
    let request = state.services.friends.accept_friend_request(auth.id(), &request_id).await?;
    Ok(HttpResponse::Ok().json(result_data("Friend request accepted", request)))
}

#[utoipa::path(
    get,
    path = "/api/users/friend-request",
    tag = "Friend requests",
    summary = "Pending and accepted requests addressed to the caller",
    responses(
        (status = 200, description = "Incoming requests", body = ApiResponse<IncomingRequests>)
    )
)]
#[get("/friend-request")]
pub async fn friend_requests(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, AppError> {
    let requests = state.services.friends.incoming_requests(auth.id()).await?;
    Ok(HttpResponse::Ok().json(result_data("Friend requests fetched successfully", requests)))
}

#[utoipa::path(
    get,
    path = "/api/users/outgoing-friend-request",
    tag = "Friend requests",
    summary = "Pending requests the caller has sent",
    responses(
        (status = 200, description = "Outgoing requests", body = ApiResponse<Vec<OutgoingRequestView>>)
    )
)]
#[get("/outgoing-friend-request")]
pub async fn outgoing_friend_requests(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, AppError> {
    let requests = state.services.friends.outgoing_requests(auth.id()).await?;
    Ok(HttpResponse::Ok().json(result_data("Outgoing friend requests fetched successfully", requests)))
}
