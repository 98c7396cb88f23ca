//! Typed storage seams for the two document kinds. Services only see these
//! traits; `mongo_*` modules back them with MongoDB and `memory_store` with
//! in-process concurrent maps.
pub mod friend_request_repository;
pub mod memory_store;
pub mod mongo_friend_request_repository;
pub mod mongo_user_repository;
pub mod user_repository;

pub use friend_request_repository::FriendRequestRepository;
pub use memory_store::MemoryStore;
pub use mongo_friend_request_repository::MongoFriendRequestRepository;
pub use mongo_user_repository::MongoUserRepository;
pub use user_repository::UserRepository;
