/// Reasons a duel action is rejected. All of these are recoverable,
/// user-visible conditions; the engine renders them as chat notices and
/// nothing in this core escalates to a crash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuelError {
    /// Challenging yourself is rejected before any state is created.
    SelfChallenge,
    /// The named user is already in an active match.
    AlreadyFighting(String),
    /// The target already has a pending challenge waiting on them.
    AlreadyChallenged(String),
    /// `!accept` with nothing to accept.
    NoChallenge,
    /// The pending challenge's deadline passed before it was accepted.
    ChallengeExpired,
}

impl std::fmt::Display for DuelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfChallenge => write!(f, "You can't start a bread fight with yourself!"),
            Self::AlreadyFighting(name) => write!(f, "{name} is already in a bread fight!"),
            Self::AlreadyChallenged(name) => {
                write!(f, "{name} already has a pending challenge. Patience!")
            },
            Self::NoChallenge => write!(f, "No one has challenged you to a bread fight."),
            Self::ChallengeExpired => write!(f, "That challenge has already gone stale."),
        }
    }
}

impl std::error::Error for DuelError {}
