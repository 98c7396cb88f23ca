use crate::AppState;
use crate::middleware::{AuthUser, session_token};
use crate::result::{ApiResponse, result_data, result_msg};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use biz_service::biz_service::auth_service::{OnboardingCommand, SignupCommand};
use biz_service::entitys::user_entity::UserView;
use common::config::SessionConfig;
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(signup)
            .service(login)
            .service(logout)
            .service(me)
            .service(onboarding),
    );
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupDto {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Default)]
#[serde(default)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingDto {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    pub profile_pic: Option<String>,
}

fn session_cookie<'a>(session: &SessionConfig, token: String) -> Cookie<'a> {
    let max_age = i64::try_from(session.ttl_secs).unwrap_or(i64::MAX);
    Cookie::build(session.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(max_age))
        .finish()
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    summary = "Create an account and start a session",
    request_body = SignupDto,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserView>),
        (status = 400, description = "Missing or invalid fields, or email taken")
    )
)]
#[post("/signup")]
pub async fn signup(state: web::Data<AppState>, dto: web::Json<SignupDto>) -> Result<HttpResponse, AppError> {
    let dto = dto.into_inner();
    let cmd = SignupCommand { full_name: dto.full_name, email: dto.email, password: dto.password };
    let signed = state.services.auth.signup(cmd).await?;
    Ok(HttpResponse::Created()
        .cookie(session_cookie(&state.session, signed.token))
        .json(result_data("User created successfully", signed.user.to_view())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in with email and password",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<UserView>),
        (status = 401, description = "Invalid email or password")
    )
)]
#[post("/login")]
pub async fn login(state: web::Data<AppState>, dto: web::Json<LoginDto>) -> Result<HttpResponse, AppError> {
    dto.validate()?;
    let signed = state.services.auth.login(&dto.email, &dto.password).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state.session, signed.token))
        .json(result_data("Logged in successfully", signed.user.to_view())))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "End the current session",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<String>)
    )
)]
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    if let Some(token) = session_token(&req, &state.session.cookie_name) {
        state.services.auth.logout(&token);
    }
    let mut removal = Cookie::build(state.session.cookie_name.clone(), "").path("/").finish();
    removal.make_removal();
    Ok(HttpResponse::Ok().cookie(removal).json(result_msg("Logout successful")))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "The authenticated user",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserView>),
        (status = 401, description = "No or invalid session")
    )
)]
#[get("/me")]
pub async fn me(auth: AuthUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(result_data("User fetched successfully", auth.user.to_view())))
}

#[utoipa::path(
    post,
    path = "/api/auth/onboarding",
    tag = "Auth",
    summary = "Complete the language-exchange profile",
    request_body = OnboardingDto,
    responses(
        (status = 200, description = "Profile completed", body = ApiResponse<UserView>),
        (status = 400, description = "Missing fields, listed in `error`")
    )
)]
#[post("/onboarding")]
pub async fn onboarding(state: web::Data<AppState>, auth: AuthUser, dto: web::Json<OnboardingDto>) -> Result<HttpResponse, AppError> {
    let dto = dto.into_inner();
    let cmd = OnboardingCommand {
        full_name: dto.full_name,
        bio: dto.bio,
        native_language: dto.native_language,
        learning_language: dto.learning_language,
        location: dto.location,
        profile_pic: dto.profile_pic,
    };
    let user = state.services.auth.onboard(auth.id(), cmd).await?;
    Ok(HttpResponse::Ok().json(result_data("Onboarding completed", user.to_view())))
}
