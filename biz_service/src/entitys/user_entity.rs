use common::UserId;
use mongo_macro::MongoIndexModelProvider as MongoDeriveMongoIndex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User document: login identity plus the language-exchange profile.
///
/// `friends` is a denormalized cache of accepted friend requests and is only
/// written by the friend-request workflow.
#[derive(Debug, Clone, Serialize, Deserialize, Default, MongoDeriveMongoIndex)]
#[mongo_index(fields["email"], unique, name = "uniq_email")]
#[mongo_index(fields["isOnboarded"])]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    /// Salted digest, never the clear text.
    pub password: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub native_language: String,
    #[serde(default)]
    pub learning_language: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_onboarded: bool,
    #[serde(default)]
    pub friends: Vec<UserId>,
    pub create_time: i64,
    pub update_time: i64,
}

impl UserEntity {
    pub fn has_friend(&self, user_id: &str) -> bool {
        self.friends.iter().any(|f| f == user_id)
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            profile_pic: self.profile_pic.clone(),
            native_language: self.native_language.clone(),
            learning_language: self.learning_language.clone(),
            location: self.location.clone(),
            bio: self.bio.clone(),
            is_onboarded: self.is_onboarded,
        }
    }

    pub fn to_view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            profile_pic: self.profile_pic.clone(),
            native_language: self.native_language.clone(),
            learning_language: self.learning_language.clone(),
            location: self.location.clone(),
            bio: self.bio.clone(),
            is_onboarded: self.is_onboarded,
            friends: self.friends.clone(),
            create_time: self.create_time,
        }
    }
}

/// Fields other users may see.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub full_name: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub bio: String,
    pub is_onboarded: bool,
}

/// The caller's own account, minus the password digest.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub bio: String,
    pub is_onboarded: bool,
    pub friends: Vec<UserId>,
    pub create_time: i64,
}

/// Profile fields written when onboarding completes.
#[derive(Debug, Clone, Default)]
pub struct OnboardingProfile {
    pub full_name: String,
    pub bio: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub profile_pic: Option<String>,
}
