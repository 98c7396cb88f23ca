mod auth_handler;
mod common_handler;
mod friend_handler;
mod swagger;
mod user_handler;


use crate::AppState;
use crate::middleware::AuthMiddleware;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    cfg.app_data(state.clone());
    common_handler::configure(cfg);
    swagger::configure(cfg);
    cfg.service(
        web::scope("/api")
            .wrap(AuthMiddleware { state })
            .configure(auth_handler::configure)
            .service(web::scope("/users").configure(user_handler::configure).configure(friend_handler::configure)),
    );
}
