//! Reward application and profile queries invoked by the command layer.
//!
//! Chat (`!redeem`) and channel-point redemptions funnel into the same
//! [`apply_reward`] call; only the source tag differs, and only chat
//! callers pay internal tokens.

use bakebot_core::progress::level_for_xp;
use bakebot_core::storage::Storage;

/// Who is asking for the reward. Channel-point redemptions were already
/// paid for on the platform side and skip the internal token charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardSource {
    ChatCommand,
    ChannelPointRedemption,
}

/// The redeemable rewards and their internal token prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardKind {
    XpBoost,
    Confetti,
    DoubleXp,
}

impl RewardKind {
    /// Parse the reward key used by `!redeem` and the channel-point title
    /// mapping.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "xp_boost" => Some(Self::XpBoost),
            "confetti" => Some(Self::Confetti),
            "doublexp" => Some(Self::DoubleXp),
            _ => None,
        }
    }

    /// Token price when redeemed via chat.
    pub fn cost(self) -> i64 {
        match self {
            Self::XpBoost => 10,
            Self::Confetti => 5,
            Self::DoubleXp => 20,
        }
    }
}

/// XP granted by an XP Boost redemption.
const XP_BOOST_AMOUNT: i64 = 50;

/// One-line usage notice for an unknown reward key.
pub const REDEEM_USAGE: &str = "Usage: !redeem <xp_boost|confetti|doublexp>";

/// Apply a reward for `user`, charging tokens only for chat callers.
/// Returns the chat response describing what happened.
pub async fn apply_reward<S: Storage>(
    store: &S,
    user: &str,
    kind: RewardKind,
    source: RewardSource,
) -> String {
    if source == RewardSource::ChatCommand {
        let record = store.get_or_create_user(user).await;
        let cost = kind.cost();
        if record.tokens < cost {
            return format!(
                "{user}, you need {cost} tokens. You have {}.",
                record.tokens
            );
        }
        store.add_tokens(user, -cost).await;
    }
    tracing::info!(user, ?kind, ?source, "Reward applied");
    match kind {
        RewardKind::XpBoost => {
            store.add_xp(user, XP_BOOST_AMOUNT).await;
            format!("{user} redeemed XP Boost! +{XP_BOOST_AMOUNT} XP")
        },
        RewardKind::Confetti => format!("{user} throws confetti everywhere!"),
        RewardKind::DoubleXp => format!("{user} activated Double XP for 5 minutes!"),
    }
}

/// `!level [user]`: format a chatter's progression line.
pub async fn level_line<S: Storage>(store: &S, user: &str) -> String {
    let record = store.get_or_create_user(user).await;
    format!(
        "{} is level {} with {} XP, {} tokens, {} wins.",
        record.name,
        level_for_xp(record.xp),
        record.xp,
        record.tokens,
        record.wins,
    )
}
