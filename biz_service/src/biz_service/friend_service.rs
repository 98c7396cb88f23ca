use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus, IncomingRequestView, IncomingRequests, OutgoingRequestView};
use crate::entitys::user_entity::{PublicUser, UserEntity};
use crate::repository::{FriendRequestRepository, UserRepository};
use common::UserId;
use common::errors::AppError;
use futures_util::try_join;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

pub const MSG_SELF_REQUEST: &str = "You can't send friend request to yourself";
pub const MSG_RECIPIENT_NOT_FOUND: &str = "Recipient not found";
pub const MSG_ALREADY_FRIENDS: &str = "You are already friends with this user";
pub const MSG_ALREADY_SENT: &str = "Friend request already sent";
pub const MSG_REQUEST_NOT_FOUND: &str = "Friend request not found";
pub const MSG_NOT_AUTHORIZED: &str = "You are not authorized to accept this request";

/// Friend-request workflow.
///
/// Per unordered pair the relationship is `none -> pending -> accepted`.
/// Acceptance flips the request first and then set-inserts each user into the
/// other's friend list; both inserts are idempotent, so accepting again (or
/// [`FriendService::reconcile_accepted`]) completes an interrupted acceptance.
pub struct FriendService {
    users: Arc<dyn UserRepository>,
    requests: Arc<dyn FriendRequestRepository>,
}

impl FriendService {
    pub fn new(users: Arc<dyn UserRepository>, requests: Arc<dyn FriendRequestRepository>) -> Self {
        Self { users, requests }
    }

    pub async fn send_friend_request(&self, sender_id: &str, recipient_id: &str) -> Result<FriendRequestEntity, AppError> {
        if sender_id == recipient_id {
            return Err(AppError::validation(MSG_SELF_REQUEST));
        }

        let recipient = self.users.find_by_id(recipient_id).await?.ok_or_else(|| AppError::not_found(MSG_RECIPIENT_NOT_FOUND))?;
        if recipient.has_friend(sender_id) {
            return Err(AppError::validation(MSG_ALREADY_FRIENDS));
        }

        if self.requests.find_between(sender_id, recipient_id).await?.is_some() {
            return Err(AppError::validation(MSG_ALREADY_SENT));
        }

        let request = FriendRequestEntity::new_pending(sender_id, recipient_id);
        if !self.requests.insert_unique(&request).await? {
            // lost a race with a concurrent send for the same pair
            warn!("duplicate friend request {} -> {} rejected by pair key", sender_id, recipient_id);
            return Err(AppError::validation(MSG_ALREADY_SENT));
        }

        info!("friend request {} created: {} -> {}", request.id, sender_id, recipient_id);
        Ok(request)
    }

    pub async fn accept_friend_request(&self, caller_id: &str, request_id: &str) -> Result<FriendRequestEntity, AppError> {
        let mut request = self.requests.find_by_id(request_id).await?.ok_or_else(|| AppError::not_found(MSG_REQUEST_NOT_FOUND))?;

        if request.recipient != caller_id {
            warn!("user {} tried to accept request {} addressed to {}", caller_id, request_id, request.recipient);
            return Err(AppError::forbidden(MSG_NOT_AUTHORIZED));
        }

        if !self.requests.mark_accepted(&request.id).await? {
            return Err(AppError::not_found(MSG_REQUEST_NOT_FOUND));
        }
        request.status = FriendRequestStatus::Accepted;

        self.link_friends(&request.sender, &request.recipient).await?;
        info!("friend request {} accepted: {} <-> {}", request.id, request.sender, request.recipient);
        Ok(request)
    }

    /// Pending and accepted requests addressed to the caller, with sender profiles.
    pub async fn incoming_requests(&self, user_id: &str) -> Result<IncomingRequests, AppError> {
        let requests = self.requests.find_by_recipient(user_id, None).await?;
        let senders: Vec<UserId> = requests.iter().map(|r| r.sender.clone()).collect();
        let profiles = self.public_profiles(&senders).await?;

        let mut result = IncomingRequests::default();
        for request in requests {
            let Some(sender) = profiles.get(&request.sender) else {
                continue;
            };
            let view = IncomingRequestView { id: request.id, sender: sender.clone(), status: request.status, create_time: request.create_time };
            match view.status {
                FriendRequestStatus::Pending => result.incoming_reqs.push(view),
                FriendRequestStatus::Accepted => result.accepted_reqs.push(view),
            }
        }
        Ok(result)
    }

    /// Requests the caller sent that are still pending, with recipient profiles.
    pub async fn outgoing_requests(&self, user_id: &str) -> Result<Vec<OutgoingRequestView>, AppError> {
        let requests = self.requests.find_by_sender(user_id, Some(FriendRequestStatus::Pending)).await?;
        let recipients: Vec<UserId> = requests.iter().map(|r| r.recipient.clone()).collect();
        let profiles = self.public_profiles(&recipients).await?;

        Ok(requests
            .into_iter()
            .filter_map(|request| {
                let recipient = profiles.get(&request.recipient)?.clone();
                Some(OutgoingRequestView { id: request.id, recipient, status: request.status, create_time: request.create_time })
            })
            .collect())
    }

    /// Re-applies the friend-list edges of every accepted request.
    /// Returns how many missing edges were written.
    pub async fn reconcile_accepted(&self) -> Result<usize, AppError> {
        let accepted = self.requests.find_by_status(FriendRequestStatus::Accepted).await?;
        let mut repaired = 0;
        for request in &accepted {
            let ids = [request.sender.clone(), request.recipient.clone()];
            let users: HashMap<UserId, UserEntity> = self.users.find_by_ids(&ids).await?.into_iter().map(|u| (u.id.clone(), u)).collect();

            for (owner, friend) in [(&request.sender, &request.recipient), (&request.recipient, &request.sender)] {
                let Some(user) = users.get(owner) else {
                    warn!("accepted request {} references missing user {}", request.id, owner);
                    continue;
                };
                if !user.has_friend(friend) && self.users.add_friend(owner, friend).await? {
                    repaired += 1;
                }
            }
        }
        if repaired > 0 {
            info!("reconciliation repaired {} friend edges across {} accepted requests", repaired, accepted.len());
        }
        Ok(repaired)
    }

    async fn link_friends(&self, sender: &str, recipient: &str) -> Result<(), AppError> {
        let (sender_found, recipient_found) = try_join!(self.users.add_friend(sender, recipient), self.users.add_friend(recipient, sender))?;
        if !sender_found || !recipient_found {
            warn!("friend link {} <-> {} touched a missing user", sender, recipient);
        }
        Ok(())
    }

    async fn public_profiles(&self, ids: &[UserId]) -> Result<HashMap<UserId, PublicUser>, AppError> {
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();
        let users = self.users.find_by_ids(&unique).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u.to_public())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biz_service::user_service::UserService;
    use crate::repository::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        friends: FriendService,
        users: UserService,
    }

    async fn fixture(ids: &[&str]) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        for (i, id) in ids.iter().enumerate() {
            let user = UserEntity {
                id: id.to_string(),
                email: format!("{id}@example.com"),
                full_name: id.to_uppercase(),
                is_onboarded: true,
                create_time: i as i64,
                ..Default::default()
            };
            UserRepository::insert(store.as_ref(), &user).await.unwrap();
        }
        Fixture { friends: FriendService::new(store.clone(), store.clone()), users: UserService::new(store.clone()), store }
    }

    async fn friends_of(store: &MemoryStore, id: &str) -> Vec<String> {
        UserRepository::find_by_id(store, id).await.unwrap().unwrap().friends
    }

    fn message(err: AppError) -> String {
        err.to_string()
    }

    #[tokio::test]
    async fn send_to_self_is_rejected() {
        let f = fixture(&["a"]).await;
        let err = f.friends.send_friend_request("a", "a").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(message(err), MSG_SELF_REQUEST);

        // self check wins even when the id does not exist
        let err = f.friends.send_friend_request("ghost", "ghost").await.unwrap_err();
        assert_eq!(message(err), MSG_SELF_REQUEST);
    }

    #[tokio::test]
    async fn send_to_unknown_recipient_is_not_found() {
        let f = fixture(&["a"]).await;
        let err = f.friends.send_friend_request("a", "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(message(err), MSG_RECIPIENT_NOT_FOUND);
    }

    #[tokio::test]
    async fn second_send_in_either_direction_is_already_sent() {
        let f = fixture(&["a", "b"]).await;
        f.friends.send_friend_request("a", "b").await.unwrap();

        let again = f.friends.send_friend_request("a", "b").await.unwrap_err();
        assert_eq!(message(again), MSG_ALREADY_SENT);
        let reverse = f.friends.send_friend_request("b", "a").await.unwrap_err();
        assert!(matches!(reverse, AppError::Validation(_)));
        assert_eq!(message(reverse), MSG_ALREADY_SENT);
    }

    #[tokio::test]
    async fn send_to_existing_friend_is_already_friends() {
        let f = fixture(&["a", "b"]).await;
        f.store.add_friend("a", "b").await.unwrap();
        f.store.add_friend("b", "a").await.unwrap();
        let err = f.friends.send_friend_request("a", "b").await.unwrap_err();
        assert_eq!(message(err), MSG_ALREADY_FRIENDS);
    }

    #[tokio::test]
    async fn only_the_recipient_may_accept() {
        let f = fixture(&["a", "b", "c"]).await;
        let request = f.friends.send_friend_request("a", "b").await.unwrap();

        let by_sender = f.friends.accept_friend_request("a", &request.id).await.unwrap_err();
        assert!(matches!(by_sender, AppError::Forbidden(_)));
        let by_stranger = f.friends.accept_friend_request("c", &request.id).await.unwrap_err();
        assert!(matches!(by_stranger, AppError::Forbidden(_)));

        f.friends.accept_friend_request("b", &request.id).await.unwrap();
        // still forbidden once accepted
        let after = f.friends.accept_friend_request("a", &request.id).await.unwrap_err();
        assert!(matches!(after, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn accepting_unknown_request_is_not_found() {
        let f = fixture(&["a"]).await;
        let err = f.friends.accept_friend_request("a", "missing").await.unwrap_err();
        assert_eq!(message(err), MSG_REQUEST_NOT_FOUND);
    }

    #[tokio::test]
    async fn full_request_lifecycle() {
        let f = fixture(&["a", "b", "c"]).await;
        let request = f.friends.send_friend_request("a", "b").await.unwrap();
        assert_eq!(request.status, FriendRequestStatus::Pending);

        assert!(f.friends.outgoing_requests("b").await.unwrap().is_empty());
        let outgoing = f.friends.outgoing_requests("a").await.unwrap();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].recipient.id, "b");

        let incoming = f.friends.incoming_requests("b").await.unwrap();
        assert_eq!(incoming.incoming_reqs.len(), 1);
        assert_eq!(incoming.incoming_reqs[0].sender.id, "a");
        assert!(incoming.accepted_reqs.is_empty());

        let accepted = f.friends.accept_friend_request("b", &request.id).await.unwrap();
        assert!(accepted.is_accepted());

        assert_eq!(friends_of(&f.store, "a").await, vec!["b".to_string()]);
        assert_eq!(friends_of(&f.store, "b").await, vec!["a".to_string()]);

        let incoming = f.friends.incoming_requests("b").await.unwrap();
        assert!(incoming.incoming_reqs.is_empty());
        assert_eq!(incoming.accepted_reqs.len(), 1);
        assert_eq!(incoming.accepted_reqs[0].sender.id, "a");
        assert!(f.friends.outgoing_requests("a").await.unwrap().is_empty());

        let recs: Vec<String> = f.users.recommended_users("a").await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(recs, vec!["c".to_string()]);

        let friends = f.users.my_friends("b").await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, "a");
    }

    #[tokio::test]
    async fn friendship_stays_symmetric_and_never_self() {
        let f = fixture(&["a", "b", "c", "d"]).await;
        let pairs = [("a", "b"), ("c", "a"), ("d", "b"), ("c", "d")];
        for (s, r) in pairs {
            let req = f.friends.send_friend_request(s, r).await.unwrap();
            f.friends.accept_friend_request(r, &req.id).await.unwrap();
        }
        for id in ["a", "b", "c", "d"] {
            let mine = friends_of(&f.store, id).await;
            assert!(!mine.contains(&id.to_string()));
            for friend in mine {
                assert!(friends_of(&f.store, &friend).await.contains(&id.to_string()));
            }
        }
    }

    #[tokio::test]
    async fn concurrent_sends_create_a_single_request() {
        let f = Arc::new(fixture(&["a", "b"]).await);
        let mut handles = Vec::new();
        for i in 0..8 {
            let f = f.clone();
            handles.push(tokio::spawn(async move {
                let (s, r) = if i % 2 == 0 { ("a", "b") } else { ("b", "a") };
                f.friends.send_friend_request(s, r).await
            }));
        }
        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) => assert_eq!(e.to_string(), MSG_ALREADY_SENT),
            }
        }
        assert_eq!(ok, 1);
        let pending = f.store.find_by_status(FriendRequestStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn reaccepting_repairs_a_partial_acceptance() {
        let f = fixture(&["a", "b"]).await;
        let request = f.friends.send_friend_request("a", "b").await.unwrap();
        // simulate a crash after the status flip and one of the two inserts
        f.store.mark_accepted(&request.id).await.unwrap();
        f.store.add_friend("a", "b").await.unwrap();
        assert!(friends_of(&f.store, "b").await.is_empty());

        f.friends.accept_friend_request("b", &request.id).await.unwrap();
        assert_eq!(friends_of(&f.store, "a").await, vec!["b".to_string()]);
        assert_eq!(friends_of(&f.store, "b").await, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn reconcile_writes_only_missing_edges() {
        let f = fixture(&["a", "b", "c"]).await;
        let ab = f.friends.send_friend_request("a", "b").await.unwrap();
        f.friends.accept_friend_request("b", &ab.id).await.unwrap();

        let cb = f.friends.send_friend_request("c", "b").await.unwrap();
        f.store.mark_accepted(&cb.id).await.unwrap();

        assert_eq!(f.friends.reconcile_accepted().await.unwrap(), 2);
        assert!(friends_of(&f.store, "c").await.contains(&"b".to_string()));
        assert!(friends_of(&f.store, "b").await.contains(&"c".to_string()));
        assert_eq!(f.friends.reconcile_accepted().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn pending_requests_are_not_reconciled() {
        let f = fixture(&["a", "b"]).await;
        f.friends.send_friend_request("a", "b").await.unwrap();
        assert_eq!(f.friends.reconcile_accepted().await.unwrap(), 0);
        assert!(friends_of(&f.store, "a").await.is_empty());
    }
}
