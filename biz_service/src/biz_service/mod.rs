pub mod auth_service;
pub mod friend_service;
pub mod user_service;

use crate::manager::session_manager::SessionManager;
use crate::repository::{FriendRequestRepository, MemoryStore, MongoFriendRequestRepository, MongoUserRepository, UserRepository};
use auth_service::AuthService;
use common::config::{SessionConfig, SysConfig};
use common::errors::AppError;
use common::repository::db::Db;
use friend_service::FriendService;
use log::info;
use std::sync::Arc;
use std::time::Duration;
use user_service::UserService;

/// Storage backends shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub friend_requests: Arc<dyn FriendRequestRepository>,
}

impl Repositories {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        info!("using in-memory store");
        Self { users: store.clone(), friend_requests: store }
    }

    /// Mongo repositories over `db`, with the declared indexes created.
    pub async fn mongo(db: &Db) -> Result<Self, AppError> {
        let users = MongoUserRepository::new(db.database());
        let friend_requests = MongoFriendRequestRepository::new(db.database());
        users.dao.ensure_indexes().await?;
        friend_requests.dao.ensure_indexes().await?;
        info!("mongo repositories ready ({} / {})", users.dao.collection.name(), friend_requests.dao.collection.name());
        Ok(Self { users: Arc::new(users), friend_requests: Arc::new(friend_requests) })
    }
}

#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub friends: Arc<FriendService>,
}

impl Services {
    pub fn new(repos: &Repositories, session: &SessionConfig, sys: &SysConfig) -> Self {
        let sessions = Arc::new(SessionManager::new(Duration::from_secs(session.ttl_secs)));
        Self {
            auth: Arc::new(AuthService::new(repos.users.clone(), sessions, sys.md5_key.clone())),
            users: Arc::new(UserService::new(repos.users.clone())),
            friends: Arc::new(FriendService::new(repos.users.clone(), repos.friend_requests.clone())),
        }
    }
}
