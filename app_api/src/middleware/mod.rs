mod auth_middleware;

pub use auth_middleware::{AuthMiddleware, AuthUser, session_token};
