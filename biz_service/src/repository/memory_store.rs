use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus};
use crate::entitys::user_entity::{OnboardingProfile, UserEntity};
use crate::repository::friend_request_repository::FriendRequestRepository;
use crate::repository::user_repository::UserRepository;
use async_trait::async_trait;
use common::UserId;
use common::errors::AppError;
use common::util::date_util::now;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// In-process store backing both repositories, selected with `database.url = "memory://"`.
///
/// Uniqueness of emails and request pairs is claimed through the map entry API,
/// which holds the shard lock for the duration of the check-and-insert.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, UserEntity>,
    emails: DashMap<String, UserId>,
    requests: DashMap<String, FriendRequestEntity>,
    pairs: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn requests_where(&self, pred: impl Fn(&FriendRequestEntity) -> bool) -> Vec<FriendRequestEntity> {
        let mut list: Vec<FriendRequestEntity> = self.requests.iter().filter(|r| pred(r.value())).map(|r| r.value().clone()).collect();
        list.sort_by_key(|r| r.create_time);
        list
    }
}

fn status_matches(request: &FriendRequestEntity, status: Option<FriendRequestStatus>) -> bool {
    status.is_none_or(|s| request.status == s)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &UserEntity) -> Result<bool, AppError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(true)
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserEntity>, AppError> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, AppError> {
        let Some(id) = self.emails.get(email).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<UserEntity>, AppError> {
        Ok(ids.iter().filter_map(|id| self.users.get(id).map(|u| u.value().clone())).collect())
    }

    async fn find_excluding(&self, caller_id: &str, friends: &[UserId]) -> Result<Vec<UserEntity>, AppError> {
        let mut list: Vec<UserEntity> = self
            .users
            .iter()
            .filter(|u| u.is_onboarded && u.id != caller_id && !friends.contains(&u.id))
            .map(|u| u.value().clone())
            .collect();
        list.sort_by_key(|u| u.create_time);
        Ok(list)
    }

    async fn complete_onboarding(&self, id: &str, profile: &OnboardingProfile) -> Result<Option<UserEntity>, AppError> {
        let Some(mut user) = self.users.get_mut(id) else {
            return Ok(None);
        };
        user.full_name = profile.full_name.clone();
        user.bio = profile.bio.clone();
        user.native_language = profile.native_language.clone();
        user.learning_language = profile.learning_language.clone();
        user.location = profile.location.clone();
        if let Some(pic) = &profile.profile_pic {
            user.profile_pic = pic.clone();
        }
        user.is_onboarded = true;
        user.update_time = now();
        Ok(Some(user.clone()))
    }

    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<bool, AppError> {
        let Some(mut user) = self.users.get_mut(user_id) else {
            return Ok(false);
        };
        if !user.has_friend(friend_id) {
            user.friends.push(friend_id.to_string());
            user.update_time = now();
        }
        Ok(true)
    }
}

#[async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn insert_unique(&self, request: &FriendRequestEntity) -> Result<bool, AppError> {
        match self.pairs.entry(request.pair_key.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                self.requests.insert(request.id.clone(), request.clone());
                slot.insert(request.id.clone());
                Ok(true)
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FriendRequestEntity>, AppError> {
        Ok(self.requests.get(id).map(|r| r.value().clone()))
    }

    async fn find_between(&self, a: &str, b: &str) -> Result<Option<FriendRequestEntity>, AppError> {
        Ok(self
            .requests
            .iter()
            .find(|r| (r.sender == a && r.recipient == b) || (r.sender == b && r.recipient == a))
            .map(|r| r.value().clone()))
    }

    async fn find_by_recipient(&self, recipient: &str, status: Option<FriendRequestStatus>) -> Result<Vec<FriendRequestEntity>, AppError> {
        Ok(self.requests_where(|r| r.recipient == recipient && status_matches(r, status)))
    }

    async fn find_by_sender(&self, sender: &str, status: Option<FriendRequestStatus>) -> Result<Vec<FriendRequestEntity>, AppError> {
        Ok(self.requests_where(|r| r.sender == sender && status_matches(r, status)))
    }

    async fn find_by_status(&self, status: FriendRequestStatus) -> Result<Vec<FriendRequestEntity>, AppError> {
        Ok(self.requests_where(|r| r.status == status))
    }

    async fn mark_accepted(&self, id: &str) -> Result<bool, AppError> {
        let Some(mut request) = self.requests.get_mut(id) else {
            return Ok(false);
        };
        request.status = FriendRequestStatus::Accepted;
        request.update_time = now();
        Ok(true)
    }
}
