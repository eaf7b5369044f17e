pub mod broadcast;
pub mod config;
pub mod duel;
pub mod error;
pub mod rewards;

use std::time::Duration;

use tokio::sync::mpsc;

use bakebot_core::cooldown::CooldownManager;
use bakebot_core::hooks::RewardHooks;
use bakebot_core::rate_limit::RateLimiter;

pub use broadcast::BroadcastSlot;
pub use config::GamesConfig;
pub use duel::DuelEngine;
pub use error::DuelError;

/// Outbound chat sink. The engine writes one plain-text line per event;
/// the surrounding transport forwards them to chat.
pub type ChatSender = mpsc::Sender<String>;

/// Non-blocking send into the chat sink. A full or closed sink drops the
/// line with a debug log; the games must never stall on a slow transport.
pub(crate) fn say(chat: &ChatSender, line: String) {
    if let Err(e) = chat.try_send(line) {
        tracing::debug!(error = %e, "Dropping chat line (sink full or closed)");
    }
}

/// Front door for the mini-game core: owns the broadcast slot, the duel
/// engine, and the admission gates applied to every player action.
pub struct GameHub {
    pub broadcast: BroadcastSlot,
    pub duels: DuelEngine,
    cooldowns: CooldownManager,
    limiter: RateLimiter,
    command_cooldown: Duration,
}

impl GameHub {
    pub fn new(chat: ChatSender, hooks: RewardHooks, config: &GamesConfig) -> Self {
        let broadcast = BroadcastSlot::new(
            chat.clone(),
            hooks.award_win.clone(),
            (&config.broadcast).into(),
        );
        let duels = DuelEngine::new(chat, hooks, (&config.duel).into());
        Self {
            broadcast,
            duels,
            cooldowns: CooldownManager::new(),
            limiter: RateLimiter::new(
                config.limits.rate_max_per_window,
                config.limits.rate_window(),
            ),
            command_cooldown: config.limits.command_cooldown(),
        }
    }

    /// Global per-user command gate: a short cooldown plus sliding-window
    /// rate limiting. The command layer calls this before dispatching any
    /// command; a `false` means silently ignore the command.
    pub async fn admit(&self, author: &str) -> bool {
        self.cooldowns
            .check(&format!("cmd:{author}"), self.command_cooldown)
            .await
            && self.limiter.allow(author).await
    }

    /// Route one inbound chat message. Duel answers are tried first
    /// (player-scoped and exclusive); anything not consumed there is
    /// checked against the broadcast game. Out-of-context messages are
    /// no-ops by design.
    pub async fn handle_message(&self, author: &str, text: &str) {
        if self.duels.on_message(author, text).await {
            return;
        }
        self.broadcast.on_message(author, text).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use bakebot_core::test_helpers::recording_hooks;

    fn make_hub() -> (GameHub, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(256);
        let (hooks, _) = recording_hooks(HashMap::new());
        let config = GamesConfig {
            limits: config::LimitsConfig {
                rate_max_per_window: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        (GameHub::new(tx, hooks, &config), rx)
    }

    #[tokio::test]
    async fn admit_blocks_rapid_repeat_commands() {
        let (hub, _rx) = make_hub();
        assert!(hub.admit("alice").await);
        // Within the 3s command cooldown.
        assert!(!hub.admit("alice").await);
        // Other users are unaffected.
        assert!(hub.admit("bob").await);
    }

    #[tokio::test]
    async fn cooldown_rejection_does_not_consume_rate_budget() {
        let (hub, _rx) = make_hub();
        assert!(hub.admit("alice").await);
        for _ in 0..10 {
            assert!(!hub.admit("alice").await);
        }
        // Budget is 3 per window; only one admission has been recorded, so
        // the rate limiter itself has not locked alice out.
        assert!(!hub.admit("alice").await);
    }

    #[tokio::test]
    async fn stray_message_is_a_noop() {
        let (hub, mut rx) = make_hub();
        hub.handle_message("alice", "hello bakers").await;
        assert!(rx.try_recv().is_err());
    }
}
