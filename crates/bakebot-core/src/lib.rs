pub mod cooldown;
pub mod fuzzy;
pub mod hooks;
pub mod pantry;
pub mod progress;
pub mod question;
pub mod rate_limit;
pub mod storage;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;
    use std::sync::Arc;

    use futures::FutureExt;
    use tokio::sync::Mutex;

    use crate::hooks::{AwardFn, RewardHooks, XpLookupFn};
    use crate::storage::{Storage, UserRecord};

    /// In-memory storage backend for tests.
    #[derive(Default)]
    pub struct MemoryStorage {
        users: Mutex<HashMap<String, UserRecord>>,
        metadata: Mutex<HashMap<String, String>>,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a user with the given XP before a test runs.
        pub async fn seed_xp(&self, name: &str, xp: i64) {
            let mut users = self.users.lock().await;
            users
                .entry(name.to_string())
                .or_insert_with(|| UserRecord::new(name))
                .xp = xp;
        }
    }

    impl Storage for MemoryStorage {
        async fn get_or_create_user(&self, name: &str) -> UserRecord {
            let mut users = self.users.lock().await;
            users
                .entry(name.to_string())
                .or_insert_with(|| UserRecord::new(name))
                .clone()
        }

        async fn add_xp(&self, name: &str, amount: i64) {
            let mut users = self.users.lock().await;
            users
                .entry(name.to_string())
                .or_insert_with(|| UserRecord::new(name))
                .xp += amount;
        }

        async fn add_tokens(&self, name: &str, amount: i64) {
            let mut users = self.users.lock().await;
            users
                .entry(name.to_string())
                .or_insert_with(|| UserRecord::new(name))
                .tokens += amount;
        }

        async fn add_win(&self, name: &str) {
            let mut users = self.users.lock().await;
            users
                .entry(name.to_string())
                .or_insert_with(|| UserRecord::new(name))
                .wins += 1;
        }

        async fn get_metadata(&self, key: &str) -> Option<String> {
            self.metadata.lock().await.get(key).cloned()
        }

        async fn set_metadata(&self, key: &str, value: &str) {
            self.metadata
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
        }
    }

    /// Award invocations captured by [`recording_hooks`].
    #[derive(Clone, Default)]
    pub struct RecordedAwards {
        participation: Arc<std::sync::Mutex<Vec<String>>>,
        wins: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl RecordedAwards {
        pub fn participation_calls(&self) -> Vec<String> {
            self.participation.lock().unwrap().clone()
        }

        pub fn win_calls(&self) -> Vec<String> {
            self.wins.lock().unwrap().clone()
        }
    }

    /// Hooks that record every award call and resolve XP from a fixed map.
    /// Users absent from the map look up as 0 XP (level 1).
    pub fn recording_hooks(xp_by_user: HashMap<String, i64>) -> (RewardHooks, RecordedAwards) {
        let recorded = RecordedAwards::default();

        let participation_log = Arc::clone(&recorded.participation);
        let award_participation: AwardFn = Arc::new(move |user: String| {
            let log = Arc::clone(&participation_log);
            async move {
                log.lock().unwrap().push(user);
            }
            .boxed()
        });

        let win_log = Arc::clone(&recorded.wins);
        let award_win: AwardFn = Arc::new(move |user: String| {
            let log = Arc::clone(&win_log);
            async move {
                log.lock().unwrap().push(user);
            }
            .boxed()
        });

        let lookup_xp: XpLookupFn = Arc::new(move |user: String| {
            let xp = xp_by_user.get(&user).copied().unwrap_or(0);
            async move { xp }.boxed()
        });

        (
            RewardHooks {
                award_participation,
                award_win,
                lookup_xp,
            },
            recorded,
        )
    }
}
