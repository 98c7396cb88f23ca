pub mod handlers;
pub mod middleware;
pub mod result;

use biz_service::biz_service::Services;
use common::config::SessionConfig;

/// Shared per-process state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub session: SessionConfig,
}
