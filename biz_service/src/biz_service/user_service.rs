use crate::entitys::user_entity::{PublicUser, UserEntity};
use crate::repository::UserRepository;
use common::errors::AppError;
use log::debug;
use std::sync::Arc;

pub const USER_NOT_FOUND: &str = "User not found";

/// Read side of the user directory: recommendations and friend lists.
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserEntity, AppError> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    /// Every onboarded user who is neither the caller nor already a friend.
    pub async fn recommended_users(&self, user_id: &str) -> Result<Vec<PublicUser>, AppError> {
        let me = self.get_user(user_id).await?;
        let users = self.users.find_excluding(&me.id, &me.friends).await?;
        debug!("{} recommendations for {}", users.len(), user_id);
        Ok(users.iter().map(UserEntity::to_public).collect())
    }

    pub async fn my_friends(&self, user_id: &str) -> Result<Vec<PublicUser>, AppError> {
        let me = self.get_user(user_id).await?;
        let friends = self.users.find_by_ids(&me.friends).await?;
        Ok(friends.iter().map(UserEntity::to_public).collect())
    }
}
