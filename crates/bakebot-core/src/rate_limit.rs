use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default admissions per user per window.
pub const DEFAULT_MAX_PER_WINDOW: usize = 8;
/// Default sliding window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

/// Per-user sliding-window admission control for command floods.
///
/// Timestamps older than the window are pruned lazily on each check; there
/// is no background sweep, and nothing evicts the map entry of a user who
/// has gone quiet.
pub struct RateLimiter {
    history: Mutex<HashMap<String, Vec<Instant>>>,
    max_per_window: usize,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_WINDOW, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_per_window: usize, window: Duration) -> Self {
        Self {
            history: Mutex::new(HashMap::new()),
            max_per_window,
            window,
        }
    }

    /// Returns `true` and records the admission iff the user has made fewer
    /// than `max_per_window` admitted requests in the trailing window.
    pub async fn allow(&self, user: &str) -> bool {
        self.allow_at(user, Instant::now()).await
    }

    /// Deterministic seam: same as [`allow`](Self::allow) with an explicit
    /// notion of "now". `now` must be monotonically non-decreasing across
    /// calls for a given user.
    pub async fn allow_at(&self, user: &str, now: Instant) -> bool {
        let mut history = self.history.lock().await;
        let window = history.entry(user.to_string()).or_default();
        window.retain(|&t| now.saturating_duration_since(t) < self.window);
        if window.len() < self.max_per_window {
            window.push(now);
            true
        } else {
            tracing::debug!(user, "Rate limit exceeded");
            false
        }
    }
}
