use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus};
use crate::repository::friend_request_repository::FriendRequestRepository;
use async_trait::async_trait;
use common::errors::AppError;
use common::query_builder::QueryBuilder;
use common::repository_util::{is_duplicate_key, BaseRepository, Repository};
use common::util::date_util::now;
use mongodb::Database;
use mongodb::bson::doc;

pub const FRIEND_REQUEST_COLLECTION: &str = "friend_requests";

#[derive(Debug, Clone)]
pub struct MongoFriendRequestRepository {
    pub dao: BaseRepository<FriendRequestEntity>,
}

impl MongoFriendRequestRepository {
    pub fn new(db: &Database) -> Self {
        Self { dao: BaseRepository::new(db, FRIEND_REQUEST_COLLECTION) }
    }

    async fn query_by(&self, field: &str, user_id: &str, status: Option<FriendRequestStatus>) -> Result<Vec<FriendRequestEntity>, AppError> {
        let mut builder = QueryBuilder::new().eq(field, user_id);
        if let Some(status) = status {
            builder = builder.eq("status", status.as_str());
        }
        Ok(self.dao.query(builder.build()).await?)
    }
}

#[async_trait]
impl FriendRequestRepository for MongoFriendRequestRepository {
    // duplicate `pairKey` -> Ok(false); the in-memory store's tests pin this contract
    async fn insert_unique(&self, request: &FriendRequestEntity) -> Result<bool, AppError> {
        match self.dao.insert(request).await {
            Ok(()) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FriendRequestEntity>, AppError> {
        Ok(self.dao.find_by_id(id).await?)
    }

    async fn find_between(&self, a: &str, b: &str) -> Result<Option<FriendRequestEntity>, AppError> {
        // matched on the endpoints, so documents written before pairKey existed are found too
        let filter = QueryBuilder::new().eq("sender", a).eq("recipient", b).or().eq("sender", b).eq("recipient", a).build();
        Ok(self.dao.find_one(filter).await?)
    }

    async fn find_by_recipient(&self, recipient: &str, status: Option<FriendRequestStatus>) -> Result<Vec<FriendRequestEntity>, AppError> {
        self.query_by("recipient", recipient, status).await
    }

    async fn find_by_sender(&self, sender: &str, status: Option<FriendRequestStatus>) -> Result<Vec<FriendRequestEntity>, AppError> {
        self.query_by("sender", sender, status).await
    }

    async fn find_by_status(&self, status: FriendRequestStatus) -> Result<Vec<FriendRequestEntity>, AppError> {
        Ok(self.dao.query(doc! { "status": status.as_str() }).await?)
    }

    async fn mark_accepted(&self, id: &str) -> Result<bool, AppError> {
        let matched = self
            .dao
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": FriendRequestStatus::Accepted.as_str(), "updateTime": now() } },
            )
            .await?;
        Ok(matched > 0)
    }
}
