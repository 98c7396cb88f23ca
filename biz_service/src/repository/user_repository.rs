use crate::entitys::user_entity::{OnboardingProfile, UserEntity};
use async_trait::async_trait;
use common::UserId;
use common::errors::AppError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `false` when the email is already taken.
    async fn insert(&self, user: &UserEntity) -> Result<bool, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserEntity>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, AppError>;

    /// Missing ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<UserEntity>, AppError>;

    /// Onboarded users other than `caller_id` and not in `friends`.
    async fn find_excluding(&self, caller_id: &str, friends: &[UserId]) -> Result<Vec<UserEntity>, AppError>;

    /// Writes the profile and flips the onboarded flag; `None` if the user does not exist.
    async fn complete_onboarding(&self, id: &str, profile: &OnboardingProfile) -> Result<Option<UserEntity>, AppError>;

    /// Set-insert of `friend_id` into the user's friends; `false` if the user does not exist.
    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<bool, AppError>;
}
