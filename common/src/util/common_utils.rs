use hex::encode;
use md5::{Digest, Md5};
use uuid::Uuid;

pub fn build_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn build_md5(content: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(content);
    encode(hasher.finalize())
}

/// Digest of `content` salted with `key`; used for stored passwords.
pub fn build_md5_with_key(content: &str, key: &str) -> String {
    build_md5(&format!("{content}{key}"))
}
