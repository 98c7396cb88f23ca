use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus};
use async_trait::async_trait;
use common::errors::AppError;

#[async_trait]
pub trait FriendRequestRepository: Send + Sync {
    /// Inserts unless a request already exists for the same unordered pair,
    /// in which case nothing is written and `false` is returned.
    async fn insert_unique(&self, request: &FriendRequestEntity) -> Result<bool, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<FriendRequestEntity>, AppError>;

    /// A request between `a` and `b` in either direction.
    async fn find_between(&self, a: &str, b: &str) -> Result<Option<FriendRequestEntity>, AppError>;

    async fn find_by_recipient(&self, recipient: &str, status: Option<FriendRequestStatus>) -> Result<Vec<FriendRequestEntity>, AppError>;

    async fn find_by_sender(&self, sender: &str, status: Option<FriendRequestStatus>) -> Result<Vec<FriendRequestEntity>, AppError>;

    async fn find_by_status(&self, status: FriendRequestStatus) -> Result<Vec<FriendRequestEntity>, AppError>;

    /// Sets status to accepted; `false` if the request does not exist.
    async fn mark_accepted(&self, id: &str) -> Result<bool, AppError>;
}
