use std::time::Duration;

use serde::Deserialize;

/// Top-level game configuration, loaded from `bakebot.toml`.
///
/// Fuzzy-match thresholds and reward payouts are deliberately NOT config:
/// they are game-balance contracts (see `bakebot_core::progress` and the
/// per-module score constants).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub limits: LimitsConfig,
    pub broadcast: BroadcastConfig,
    pub duel: DuelConfig,
}

impl GamesConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Command admission limits applied before any game dispatch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub command_cooldown_secs: u64,
    pub rate_max_per_window: usize,
    pub rate_window_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            command_cooldown_secs: 3,
            rate_max_per_window: 8,
            rate_window_secs: 10,
        }
    }
}

impl LimitsConfig {
    pub fn command_cooldown(&self) -> Duration {
        Duration::from_secs(self.command_cooldown_secs)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }
}

/// Broadcast mini-game round lengths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    pub guess_secs: u64,
    pub trivia_secs: u64,
    pub seasonal_secs: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            guess_secs: 30,
            trivia_secs: 25,
            seasonal_secs: 25,
        }
    }
}

/// Duel pacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    pub challenge_ttl_secs: u64,
    pub question_secs: u64,
    pub turn_gap_secs: u64,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            challenge_ttl_secs: 60,
            question_secs: 15,
            turn_gap_secs: 2,
        }
    }
}

/// Broadcast round lengths as durations (code-facing form of
/// [`BroadcastConfig`]). Tests construct these directly with millisecond
/// values to keep flows fast.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastTimings {
    pub guess: Duration,
    pub trivia: Duration,
    pub seasonal: Duration,
}

impl From<&BroadcastConfig> for BroadcastTimings {
    fn from(cfg: &BroadcastConfig) -> Self {
        Self {
            guess: Duration::from_secs(cfg.guess_secs),
            trivia: Duration::from_secs(cfg.trivia_secs),
            seasonal: Duration::from_secs(cfg.seasonal_secs),
        }
    }
}

impl Default for BroadcastTimings {
    fn default() -> Self {
        (&BroadcastConfig::default()).into()
    }
}

/// Duel pacing as durations (code-facing form of [`DuelConfig`]).
#[derive(Debug, Clone, Copy)]
pub struct DuelTimings {
    /// How long a pending challenge waits for `!accept`.
    pub challenge_ttl: Duration,
    /// How long the current player has to answer a question.
    pub question_window: Duration,
    /// Readability pause between turns.
    pub turn_gap: Duration,
}

impl From<&DuelConfig> for DuelTimings {
    fn from(cfg: &DuelConfig) -> Self {
        Self {
            challenge_ttl: Duration::from_secs(cfg.challenge_ttl_secs),
            question_window: Duration::from_secs(cfg.question_secs),
            turn_gap: Duration::from_secs(cfg.turn_gap_secs),
        }
    }
}

impl Default for DuelTimings {
    fn default() -> Self {
        (&DuelConfig::default()).into()
    }
}
