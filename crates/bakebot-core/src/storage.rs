use std::future::Future;

use serde::{Deserialize, Serialize};

/// A chatter's persisted progression record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub xp: i64,
    pub tokens: i64,
    pub wins: u32,
}

impl UserRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xp: 0,
            tokens: 0,
            wins: 0,
        }
    }
}

/// Interface to the surrounding system's persistent storage.
///
/// The game engine itself never calls this directly; it goes through the
/// injected reward hooks. The reward dispatcher and profile queries are the
/// only in-crate consumers.
pub trait Storage: Send + Sync {
    fn get_or_create_user(&self, name: &str) -> impl Future<Output = UserRecord> + Send;
    fn add_xp(&self, name: &str, amount: i64) -> impl Future<Output = ()> + Send;
    fn add_tokens(&self, name: &str, amount: i64) -> impl Future<Output = ()> + Send;
    fn add_win(&self, name: &str) -> impl Future<Output = ()> + Send;
    fn get_metadata(&self, key: &str) -> impl Future<Output = Option<String>> + Send;
    fn set_metadata(&self, key: &str, value: &str) -> impl Future<Output = ()> + Send;
}
