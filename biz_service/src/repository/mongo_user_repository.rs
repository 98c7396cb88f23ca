use crate::entitys::user_entity::{OnboardingProfile, UserEntity};
use crate::repository::user_repository::UserRepository;
use async_trait::async_trait;
use common::UserId;
use common::errors::AppError;
use common::query_builder::QueryBuilder;
use common::repository_util::{is_duplicate_key, BaseRepository, Repository};
use common::util::date_util::now;
use mongodb::Database;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;

pub const USER_COLLECTION: &str = "users";

#[derive(Debug, Clone)]
pub struct MongoUserRepository {
    pub dao: BaseRepository<UserEntity>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self { dao: BaseRepository::new(db, USER_COLLECTION) }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &UserEntity) -> Result<bool, AppError> {
        match self.dao.insert(user).await {
            Ok(()) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserEntity>, AppError> {
        Ok(self.dao.find_by_id(id).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, AppError> {
        Ok(self.dao.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<UserEntity>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = QueryBuilder::new().in_array("_id", ids.to_vec()).build();
        Ok(self.dao.query(filter).await?)
    }

    async fn find_excluding(&self, caller_id: &str, friends: &[UserId]) -> Result<Vec<UserEntity>, AppError> {
        let filter = QueryBuilder::new()
            .ne("_id", caller_id)
            .and()
            .not_in("_id", friends.to_vec())
            .and()
            .eq("isOnboarded", true)
            .build();
        Ok(self.dao.query(filter).await?)
    }

    async fn complete_onboarding(&self, id: &str, profile: &OnboardingProfile) -> Result<Option<UserEntity>, AppError> {
        let mut set = doc! {
            "fullName": profile.full_name.as_str(),
            "bio": profile.bio.as_str(),
            "nativeLanguage": profile.native_language.as_str(),
            "learningLanguage": profile.learning_language.as_str(),
            "location": profile.location.as_str(),
            "isOnboarded": true,
            "updateTime": now(),
        };
        if let Some(pic) = &profile.profile_pic {
            set.insert("profilePic", pic.as_str());
        }
        let updated = self
            .dao
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<bool, AppError> {
        let matched = self
            .dao
            .update_one(
                doc! { "_id": user_id },
                doc! { "$addToSet": { "friends": friend_id }, "$set": { "updateTime": now() } },
            )
            .await?;
        Ok(matched > 0)
    }
}
