pub mod friend_request_entity;
pub mod user_entity;
