use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::seq::IndexedRandom;
use tokio::time::Instant;
use uuid::Uuid;

use bakebot_core::fuzzy;
use bakebot_core::hooks::RewardHooks;
use bakebot_core::progress::{DUEL_MIN_SCORE, damage, level_for_xp, max_health};
use bakebot_core::question::{DUEL_QUESTIONS, Question};

use crate::config::DuelTimings;
use crate::error::DuelError;
use crate::{ChatSender, say};

/// Opaque identifier for one active match.
pub type MatchId = Uuid;

/// Which side of a match a fighter is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Challenger,
    Target,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Self::Challenger => Self::Target,
            Self::Target => Self::Challenger,
        }
    }
}

/// A challenge waiting on its target to `!accept`.
struct PendingChallenge {
    challenger: String,
    /// Target's display name; the map key is its lowercased form.
    target: String,
    challenger_level: u32,
    target_level: u32,
    expires_at: Instant,
    token: Uuid,
}

struct Fighter {
    /// Display name as it appeared in chat.
    name: String,
    /// Lowercased index key.
    key: String,
    level: u32,
    health: u32,
    max_health: u32,
}

impl Fighter {
    fn new(name: &str, level: u32) -> Self {
        Self {
            name: name.to_string(),
            key: name.to_lowercase(),
            level,
            health: max_health(level),
            max_health: max_health(level),
        }
    }
}

/// The question the current player is on the clock for. The token ties the
/// turn-timeout timer to this exact question; whichever of {answer,
/// timeout} takes the question first advances the turn, the other is a
/// stale no-op.
struct ActiveQuestion {
    question: Question,
    token: Uuid,
    deadline: Instant,
}

struct DuelMatch {
    challenger: Fighter,
    target: Fighter,
    turn: Side,
    round: u32,
    active: Option<ActiveQuestion>,
}

impl DuelMatch {
    fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Challenger => &self.challenger,
            Side::Target => &self.target,
        }
    }

    fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        match side {
            Side::Challenger => &mut self.challenger,
            Side::Target => &mut self.target,
        }
    }
}

/// Read-only view of a match, for callers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelSnapshot {
    pub challenger: FighterView,
    pub target: FighterView,
    /// Lowercased key of the player whose turn it is.
    pub turn_of: String,
    pub round: u32,
    pub question_live: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FighterView {
    pub name: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
}

impl From<&Fighter> for FighterView {
    fn from(f: &Fighter) -> Self {
        Self {
            name: f.name.clone(),
            level: f.level,
            health: f.health,
            max_health: f.max_health,
        }
    }
}

#[derive(Default)]
struct DuelState {
    /// One pending challenge per target, keyed by the target's lowercased name.
    pending: HashMap<String, PendingChallenge>,
    /// Match arena, addressed by opaque id.
    matches: HashMap<MatchId, DuelMatch>,
    /// Username index into the arena; both participants of a match are
    /// registered, and a username maps to at most one match.
    by_player: HashMap<String, MatchId>,
}

/// The bread-fight engine: challenge/accept handshake, alternating timed
/// Q&A turns, damage resolution, reward dispatch. Cheap to clone; clones
/// share state, and timer tasks run on clones.
#[derive(Clone)]
pub struct DuelEngine {
    state: Arc<Mutex<DuelState>>,
    chat: ChatSender,
    hooks: RewardHooks,
    timings: DuelTimings,
}

impl DuelEngine {
    pub fn new(chat: ChatSender, hooks: RewardHooks, timings: DuelTimings) -> Self {
        Self {
            state: Arc::new(Mutex::new(DuelState::default())),
            chat,
            hooks,
            timings,
        }
    }

    /// Whether the user is currently in an active match.
    pub fn is_fighting(&self, user: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .by_player
            .contains_key(&user.to_lowercase())
    }

    /// View of the user's active match, if any.
    pub fn snapshot(&self, user: &str) -> Option<DuelSnapshot> {
        let state = self.state.lock().unwrap();
        let id = state.by_player.get(&user.to_lowercase())?;
        let m = state.matches.get(id)?;
        Some(DuelSnapshot {
            challenger: (&m.challenger).into(),
            target: (&m.target).into(),
            turn_of: m.fighter(m.turn).key.clone(),
            round: m.round,
            question_live: m.active.is_some(),
        })
    }

    /// `!fight <target>`: issue a challenge. Rejections are announced in
    /// chat and also returned for the caller's bookkeeping.
    pub async fn challenge(&self, challenger: &str, target: &str) -> Result<(), DuelError> {
        let challenger_key = challenger.to_lowercase();
        let target_key = target.to_lowercase();
        if challenger_key == target_key {
            return self.reject(DuelError::SelfChallenge);
        }

        // Levels come from stored XP, fetched before taking the lock. The
        // lookup gets the display name, same as the award hooks; lowercased
        // forms stay internal index keys.
        let challenger_level = level_for_xp((self.hooks.lookup_xp)(challenger.to_string()).await);
        let target_level = level_for_xp((self.hooks.lookup_xp)(target.to_string()).await);

        let token = Uuid::new_v4();
        {
            let mut state = self.state.lock().unwrap();
            if state.by_player.contains_key(&challenger_key) {
                drop(state);
                return self.reject(DuelError::AlreadyFighting(challenger.to_string()));
            }
            if state.by_player.contains_key(&target_key) {
                drop(state);
                return self.reject(DuelError::AlreadyFighting(target.to_string()));
            }
            if state.pending.contains_key(&target_key) {
                drop(state);
                return self.reject(DuelError::AlreadyChallenged(target.to_string()));
            }
            state.pending.insert(
                target_key.clone(),
                PendingChallenge {
                    challenger: challenger.to_string(),
                    target: target.to_string(),
                    challenger_level,
                    target_level,
                    expires_at: Instant::now() + self.timings.challenge_ttl,
                    token,
                },
            );
        }
        tracing::info!(challenger, target, "Bread fight challenge issued");
        say(
            &self.chat,
            format!(
                "{challenger} challenges {target} to a bread fight! Type !accept within {}s to step up.",
                self.timings.challenge_ttl.as_secs()
            ),
        );

        // Reaper: if the challenge is still pending (same token) at the
        // deadline, drop it. An accepted challenge leaves a stale token.
        let this = self.clone();
        let ttl = self.timings.challenge_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            this.reap_challenge(&target_key, token);
        });
        Ok(())
    }

    fn reap_challenge(&self, target_key: &str, token: Uuid) {
        let reaped = {
            let mut state = self.state.lock().unwrap();
            match state.pending.get(target_key) {
                Some(pending) if pending.token == token => state.pending.remove(target_key),
                _ => None,
            }
        };
        match reaped {
            Some(pending) => {
                tracing::info!(
                    challenger = %pending.challenger,
                    target = target_key,
                    "Challenge expired unaccepted"
                );
                say(
                    &self.chat,
                    format!(
                        "{}'s challenge to {} went stale. The dough rests.",
                        pending.challenger, pending.target
                    ),
                );
            },
            None => tracing::debug!(target = target_key, "Stale challenge reaper, nothing to do"),
        }
    }

    /// `!accept`: consume the pending challenge against `accepter` and
    /// start the match, challenger moving first.
    pub async fn accept(&self, accepter: &str) -> Result<(), DuelError> {
        let accepter_key = accepter.to_lowercase();
        let match_id = MatchId::new_v4();
        let opener = {
            let mut state = self.state.lock().unwrap();
            // Rejections must not consume the entry: a refused accept
            // leaves the challenge in place for the reaper to expire.
            let Some(pending) = state.pending.get(&accepter_key) else {
                drop(state);
                return self.reject(DuelError::NoChallenge);
            };
            // The reaper may be about to fire; an expired entry is dead
            // even if it is still present.
            if Instant::now() >= pending.expires_at {
                drop(state);
                return self.reject(DuelError::ChallengeExpired);
            }
            let challenger_key = pending.challenger.to_lowercase();
            if state.by_player.contains_key(&challenger_key) {
                let challenger = pending.challenger.clone();
                drop(state);
                return self.reject(DuelError::AlreadyFighting(challenger));
            }
            if state.by_player.contains_key(&accepter_key) {
                drop(state);
                return self.reject(DuelError::AlreadyFighting(accepter.to_string()));
            }
            let Some(pending) = state.pending.remove(&accepter_key) else {
                drop(state);
                return self.reject(DuelError::NoChallenge);
            };

            let challenger = Fighter::new(&pending.challenger, pending.challenger_level);
            let target = Fighter::new(accepter, pending.target_level);
            let opener = format!(
                "Bread fight! {} (lvl {}, {} HP) vs {} (lvl {}, {} HP). {} goes first!",
                challenger.name,
                challenger.level,
                challenger.health,
                target.name,
                target.level,
                target.health,
                challenger.name,
            );
            state.by_player.insert(challenger_key, match_id);
            state.by_player.insert(accepter_key, match_id);
            state.matches.insert(
                match_id,
                DuelMatch {
                    challenger,
                    target,
                    turn: Side::Challenger,
                    round: 1,
                    active: None,
                },
            );
            opener
        };
        tracing::info!(accepter, "Bread fight accepted");
        say(&self.chat, opener);
        self.begin_turn(match_id);
        Ok(())
    }

    /// Put the current player on the clock with a random question and
    /// schedule the turn timeout.
    fn begin_turn(&self, match_id: MatchId) {
        let token = Uuid::new_v4();
        let line = {
            let mut state = self.state.lock().unwrap();
            let Some(m) = state.matches.get_mut(&match_id) else {
                tracing::debug!(%match_id, "Turn for a finished match, nothing to do");
                return;
            };
            let question = match DUEL_QUESTIONS.choose(&mut rand::rng()) {
                Some(q) => *q,
                None => return,
            };
            m.active = Some(ActiveQuestion {
                question,
                token,
                deadline: Instant::now() + self.timings.question_window,
            });
            format!(
                "Round {}: {}, your question ({}): {} You have {}s!",
                m.round,
                m.fighter(m.turn).name,
                question.difficulty,
                question.text,
                self.timings.question_window.as_secs(),
            )
        };
        say(&self.chat, line);

        let this = self.clone();
        let window = self.timings.question_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            this.question_timeout(match_id, token);
        });
    }

    /// Turn-timeout path: advances the turn only if this exact question is
    /// still unanswered.
    fn question_timeout(&self, match_id: MatchId, token: Uuid) {
        let line = {
            let mut state = self.state.lock().unwrap();
            let Some(m) = state.matches.get_mut(&match_id) else {
                tracing::debug!(%match_id, "Timeout for a finished match");
                return;
            };
            match &m.active {
                Some(active) if active.token == token => {},
                _ => {
                    tracing::debug!(%match_id, "Stale turn timeout, question already settled");
                    return;
                },
            }
            m.active = None;
            let slow = m.fighter(m.turn).name.clone();
            m.turn = m.turn.other();
            m.round += 1;
            format!("{slow} froze at the oven! No answer in time. No damage dealt.")
        };
        say(&self.chat, line);
        self.schedule_next_turn(match_id);
    }

    fn schedule_next_turn(&self, match_id: MatchId) {
        let this = self.clone();
        let gap = self.timings.turn_gap;
        tokio::spawn(async move {
            tokio::time::sleep(gap).await;
            this.begin_turn(match_id);
        });
    }

    /// Try to treat a chat message as a duel answer. Consumes the message
    /// only when `author` is the player on the clock for a live question;
    /// everything else returns `false` and falls through to the broadcast
    /// slot.
    pub async fn on_message(&self, author: &str, text: &str) -> bool {
        enum Outcome {
            Continue { line: String, match_id: MatchId },
            Resolved {
                line: String,
                winner: String,
                loser: String,
            },
        }

        let author_key = author.to_lowercase();
        let outcome = {
            let mut guard = self.state.lock().unwrap();
            let state = &mut *guard;
            let Some(&match_id) = state.by_player.get(&author_key) else {
                return false;
            };
            let Some(m) = state.matches.get_mut(&match_id) else {
                return false;
            };
            if m.fighter(m.turn).key != author_key {
                return false;
            }
            let now = Instant::now();
            let question = match &m.active {
                Some(active) if now < active.deadline => active.question,
                // Live question missing or past deadline: let the timeout
                // path handle the turn, this message is not an answer.
                _ => return false,
            };
            // Taking the question here is what makes answer-vs-timeout
            // exclusive: the timer that later fires finds no token.
            m.active = None;

            let score = fuzzy::score(text, question.answer);
            if score < DUEL_MIN_SCORE {
                let name = m.fighter(m.turn).name.clone();
                m.turn = m.turn.other();
                m.round += 1;
                Outcome::Continue {
                    line: format!(
                        "{name}'s answer crumbles! ({score}% match, needs {DUEL_MIN_SCORE}%). \
                         No damage."
                    ),
                    match_id,
                }
            } else {
                let attacker_side = m.turn;
                let attacker_level = m.fighter(attacker_side).level;
                let dealt = damage(attacker_level, score, question.difficulty);
                let defender = m.fighter_mut(attacker_side.other());
                defender.health = defender.health.saturating_sub(dealt);
                let defender_name = defender.name.clone();
                let defender_health = defender.health;
                let attacker_name = m.fighter(attacker_side).name.clone();

                if defender_health == 0 {
                    // Delete under both keys the instant a pool hits zero.
                    let loser_key = m.fighter(attacker_side.other()).key.clone();
                    state.by_player.remove(&author_key);
                    state.by_player.remove(&loser_key);
                    state.matches.remove(&match_id);
                    Outcome::Resolved {
                        line: format!(
                            "{attacker_name} lands a {dealt}-damage hit! {defender_name} is toast. \
                             {attacker_name} wins the bread fight!"
                        ),
                        winner: attacker_name,
                        loser: defender_name,
                    }
                } else {
                    m.turn = m.turn.other();
                    m.round += 1;
                    Outcome::Continue {
                        line: format!(
                            "{attacker_name} lands a hit for {dealt}! {defender_name} is down to \
                             {defender_health} HP."
                        ),
                        match_id,
                    }
                }
            }
        };

        match outcome {
            Outcome::Continue { line, match_id } => {
                say(&self.chat, line);
                self.schedule_next_turn(match_id);
                true
            },
            Outcome::Resolved {
                line,
                winner,
                loser,
            } => {
                tracing::info!(winner = %winner, loser = %loser, "Bread fight resolved");
                say(&self.chat, line);
                (self.hooks.award_win)(winner).await;
                (self.hooks.award_participation)(loser).await;
                true
            },
        }
    }

    /// Announce a rejection and hand the reason back.
    fn reject(&self, err: DuelError) -> Result<(), DuelError> {
        say(&self.chat, err.to_string());
        Err(err)
    }
}
