use common::UserId;
use common::util::common_utils::build_id;
use log::debug;
use moka::sync::Cache;
use std::time::Duration;

const MAX_SESSIONS: u64 = 100_000;

/// Opaque session tokens mapped to user ids, expiring after a fixed TTL.
#[derive(Clone)]
pub struct SessionManager {
    cache: Cache<String, UserId>,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(MAX_SESSIONS).time_to_live(ttl).build();
        Self { cache }
    }

    /// Issues a fresh token for the user.
    pub fn create(&self, user_id: &str) -> String {
        let token = build_id();
        self.cache.insert(token.clone(), user_id.to_string());
        debug!("session created for user {}", user_id);
        token
    }

    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.cache.get(token)
    }

    pub fn revoke(&self, token: &str) {
        self.cache.invalidate(token);
    }
}
