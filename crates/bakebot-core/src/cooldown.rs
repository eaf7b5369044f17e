use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Per-key debounce gate: a key fires at most once per interval.
///
/// Keys are arbitrary strings (e.g. `"cmd:username"`). Entries are never
/// evicted; only keys that actually fire accumulate state.
pub struct CooldownManager {
    last_fire: Mutex<HashMap<String, Instant>>,
}

impl Default for CooldownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CooldownManager {
    pub fn new() -> Self {
        Self {
            last_fire: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` and stamps now iff at least `interval` has elapsed
    /// since the key last fired. A failed check has no side effects.
    pub async fn check(&self, key: &str, interval: Duration) -> bool {
        self.check_at(key, interval, Instant::now()).await
    }

    /// Deterministic seam: same as [`check`](Self::check) with an explicit
    /// notion of "now".
    pub async fn check_at(&self, key: &str, interval: Duration, now: Instant) -> bool {
        let mut last_fire = self.last_fire.lock().await;
        match last_fire.get(key) {
            Some(&last) if now.saturating_duration_since(last) < interval => false,
            _ => {
                last_fire.insert(key.to_string(), now);
                true
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_check_fires() {
        let cooldowns = CooldownManager::new();
        assert!(cooldowns.check("cmd:alice", Duration::from_secs(3)).await);
    }

    #[tokio::test]
    async fn second_check_within_interval_is_blocked() {
        let cooldowns = CooldownManager::new();
        let t0 = Instant::now();
        assert!(cooldowns.check_at("k", Duration::from_secs(3), t0).await);
        assert!(
            !cooldowns
                .check_at("k", Duration::from_secs(3), t0 + Duration::from_secs(2))
                .await
        );
    }

    #[tokio::test]
    async fn check_after_interval_fires_again() {
        let cooldowns = CooldownManager::new();
        let t0 = Instant::now();
        assert!(cooldowns.check_at("k", Duration::from_secs(3), t0).await);
        assert!(
            cooldowns
                .check_at("k", Duration::from_secs(3), t0 + Duration::from_secs(3))
                .await
        );
    }

    #[tokio::test]
    async fn failed_check_does_not_reset_the_clock() {
        let cooldowns = CooldownManager::new();
        let t0 = Instant::now();
        assert!(cooldowns.check_at("k", Duration::from_secs(10), t0).await);
        // A blocked check at t+9 must not push the next allowed fire to t+19.
        assert!(
            !cooldowns
                .check_at("k", Duration::from_secs(10), t0 + Duration::from_secs(9))
                .await
        );
        assert!(
            cooldowns
                .check_at("k", Duration::from_secs(10), t0 + Duration::from_secs(10))
                .await
        );
    }

    #[tokio::test]
    async fn independent_keys_do_not_interfere() {
        let cooldowns = CooldownManager::new();
        let t0 = Instant::now();
        assert!(cooldowns.check_at("a", Duration::from_secs(60), t0).await);
        assert!(cooldowns.check_at("b", Duration::from_secs(60), t0).await);
        assert!(
            !cooldowns
                .check_at("a", Duration::from_secs(60), t0 + Duration::from_secs(1))
                .await
        );
    }
}
