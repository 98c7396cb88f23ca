use crate::entitys::user_entity::PublicUser;
use common::UserId;
use common::util::common_utils::build_id;
use common::util::date_util::now;
use mongo_macro::MongoIndexModelProvider as MongoDeriveMongoIndex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema, IntoStaticStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FriendRequestStatus {
    #[default]
    Pending,
    Accepted,
}

impl FriendRequestStatus {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Directed friend request. One document at most per unordered user pair,
/// guarded by the unique `pairKey` index.
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema, MongoDeriveMongoIndex)]
#[mongo_index(fields["pairKey"], unique, name = "uniq_pair_key")]
#[mongo_index(fields["recipient", "status"])]
#[mongo_index(fields["sender", "status"])]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestEntity {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender: UserId,
    pub recipient: UserId,
    pub status: FriendRequestStatus,
    pub pair_key: String,
    pub create_time: i64,
    pub update_time: i64,
}

impl FriendRequestEntity {
    pub fn new_pending(sender: &str, recipient: &str) -> Self {
        let now = now();
        Self {
            id: build_id(),
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            status: FriendRequestStatus::Pending,
            pair_key: pair_key(sender, recipient),
            create_time: now,
            update_time: now,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == FriendRequestStatus::Accepted
    }
}

/// Order-independent key for the pair `{a, b}`.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b { format!("{a}:{b}") } else { format!("{b}:{a}") }
}

/// Request as seen by its recipient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequestView {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender: PublicUser,
    pub status: FriendRequestStatus,
    pub create_time: i64,
}

/// Request as seen by its sender.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRequestView {
    #[serde(rename = "_id")]
    pub id: String,
    pub recipient: PublicUser,
    pub status: FriendRequestStatus,
    pub create_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequests {
    pub incoming_reqs: Vec<IncomingRequestView>,
    pub accepted_reqs: Vec<IncomingRequestView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::index_trait::MongoIndexModelProvider;
    use mongodb::bson::{self, doc};

    #[test]
    fn pair_key_ignores_direction() {
        assert_eq!(pair_key("alice", "bob"), pair_key("bob", "alice"));
        assert_eq!(pair_key("alice", "bob"), "alice:bob");
        assert_ne!(pair_key("alice", "bob"), pair_key("alice", "carol"));
    }

    #[test]
    fn new_request_is_pending() {
        let req = FriendRequestEntity::new_pending("b", "a");
        assert_eq!(req.status, FriendRequestStatus::Pending);
        assert_eq!(req.pair_key, "a:b");
        assert_eq!(req.sender, "b");
        assert!(!req.id.is_empty());
        assert!(!req.is_accepted());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(FriendRequestStatus::Accepted.as_str(), "accepted");
        assert_eq!(FriendRequestStatus::Pending.to_string(), "pending");
        let doc = bson::to_document(&FriendRequestEntity::new_pending("a", "b")).unwrap();
        assert_eq!(doc.get_str("status").unwrap(), "pending");
        assert_eq!(doc.get_str("pairKey").unwrap(), "a:b");
    }

    #[test]
    fn pair_key_index_is_unique() {
        let models = FriendRequestEntity::index_models();
        assert_eq!(models.len(), 3);
        assert_eq!(models[0].keys, doc! { "pairKey": 1 });
        let options = models[0].options.as_ref().unwrap();
        assert_eq!(options.unique, Some(true));
        assert_eq!(options.name.as_deref(), Some("uniq_pair_key"));
        assert_eq!(models[1].keys, doc! { "recipient": 1, "status": 1 });
    }
}
