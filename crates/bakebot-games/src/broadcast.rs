use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::seq::IndexedRandom;
use tokio::time::Instant;
use uuid::Uuid;

use bakebot_core::fuzzy;
use bakebot_core::hooks::AwardFn;
use bakebot_core::pantry::{self, Season};
use bakebot_core::storage::Storage;

use crate::config::BroadcastTimings;
use crate::{ChatSender, say};

/// Minimum fuzzy score for a broadcast-game guess to count. Load-bearing
/// balance constant, not a tunable.
pub const BROADCAST_MIN_SCORE: u8 = 90;

/// Storage metadata key under which the active season tag is persisted.
pub const SEASON_METADATA_KEY: &str = "season";

/// Which broadcast mini-game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Guess,
    Trivia,
    Seasonal,
}

/// The single live broadcast game. The token identifies this instance to
/// its deadline timer; a timer holding a stale token is a no-op.
struct ActiveGame {
    kind: GameKind,
    answer: String,
    token: Uuid,
    expires_at: Instant,
}

/// The process-wide broadcast game slot: at most one game at a time, any
/// chatter may answer. Cheap to clone; clones share the slot.
#[derive(Clone)]
pub struct BroadcastSlot {
    slot: Arc<Mutex<Option<ActiveGame>>>,
    season: Arc<Mutex<Option<Season>>>,
    chat: ChatSender,
    award_win: AwardFn,
    timings: BroadcastTimings,
}

impl BroadcastSlot {
    pub fn new(chat: ChatSender, award_win: AwardFn, timings: BroadcastTimings) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            season: Arc::new(Mutex::new(None)),
            chat,
            award_win,
            timings,
        }
    }

    /// Set or clear the seasonal theme. Authorization (broadcaster-only) is
    /// enforced by the calling layer, not here.
    pub fn set_season(&self, season: Option<Season>) {
        *self.season.lock().unwrap() = season;
        tracing::info!(?season, "Season changed");
    }

    pub fn season(&self) -> Option<Season> {
        *self.season.lock().unwrap()
    }

    /// The kind of the currently running game, if any.
    pub fn active_kind(&self) -> Option<GameKind> {
        self.slot.lock().unwrap().as_ref().map(|g| g.kind)
    }

    /// Time left on the current game's clock, if one is running.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.slot
            .lock()
            .unwrap()
            .as_ref()
            .map(|g| g.expires_at.saturating_duration_since(Instant::now()))
    }

    /// Start guess-the-ingredient. `pool` overrides the default ingredient
    /// list; `answer` forces a specific answer (used by tests and themed
    /// rounds). Returns `false` (after a busy notice) if a game is already
    /// running.
    pub fn start_guess(&self, pool: Option<&[&str]>, answer: Option<&str>) -> bool {
        let pool = pool.unwrap_or(pantry::INGREDIENTS);
        let answer = match answer {
            Some(a) => a.to_string(),
            None => match pool.choose(&mut rand::rng()) {
                Some(a) => (*a).to_string(),
                None => return false,
            },
        };
        let hint = mask_hint(&answer);
        let duration = self.timings.guess;
        let secs = duration.as_secs();
        self.begin(
            GameKind::Guess,
            answer,
            duration,
            format!("Guess the Ingredient! Hint: {hint} (You have {secs}s. Use chat to guess!)"),
        )
    }

    /// Start oven-timer trivia with a random question from the fixed pool.
    pub fn start_trivia(&self) -> bool {
        let (question, answer) = match pantry::TRIVIA.choose(&mut rand::rng()) {
            Some(&qa) => qa,
            None => return false,
        };
        let duration = self.timings.trivia;
        let secs = duration.as_secs();
        self.begin(
            GameKind::Trivia,
            answer.to_string(),
            duration,
            format!("Oven Timer Trivia: {question} ({secs}s to answer!)"),
        )
    }

    /// Start a seasonal guessing round themed by the current season.
    pub fn start_seasonal(&self) -> bool {
        let (title, pool) = pantry::seasonal_pool(self.season());
        let answer = match pool.choose(&mut rand::rng()) {
            Some(a) => (*a).to_string(),
            None => return false,
        };
        let duration = self.timings.seasonal;
        let secs = duration.as_secs();
        self.begin(
            GameKind::Seasonal,
            answer,
            duration,
            format!("{title}! Guess it in {secs}s!"),
        )
    }

    /// Atomic check-then-create: refuses (with a busy notice) while a game
    /// is active, otherwise installs the game and schedules its deadline.
    fn begin(&self, kind: GameKind, answer: String, duration: Duration, prompt: String) -> bool {
        let token = Uuid::new_v4();
        {
            let mut slot = self.slot.lock().unwrap();
            if slot.is_some() {
                drop(slot);
                say(
                    &self.chat,
                    "Another game is already running. Please wait!".to_string(),
                );
                return false;
            }
            *slot = Some(ActiveGame {
                kind,
                answer: answer.clone(),
                token,
                expires_at: Instant::now() + duration,
            });
        }
        tracing::info!(?kind, "Broadcast game started");
        say(&self.chat, prompt);

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            this.expire(kind, token, &answer);
        });
        true
    }

    /// Deadline handler. Only acts if the slot still holds the instance the
    /// timer was scheduled for; a game resolved by a correct guess leaves a
    /// stale token behind and the timer does nothing.
    fn expire(&self, kind: GameKind, token: Uuid, answer: &str) {
        {
            let mut slot = self.slot.lock().unwrap();
            match slot.as_ref() {
                Some(game) if game.token == token => {
                    *slot = None;
                },
                _ => {
                    tracing::debug!(?kind, "Stale broadcast deadline, game already gone");
                    return;
                },
            }
        }
        tracing::info!(?kind, "Broadcast game expired unanswered");
        let line = match kind {
            GameKind::Guess => format!("Time's up! The ingredient was: {answer}."),
            GameKind::Trivia => format!("Ding! Time's up. Correct answer: {answer}."),
            GameKind::Seasonal => format!("Seasonal round over! It was: {answer}."),
        };
        say(&self.chat, line);
    }

    /// Check one chat message against the active game. A winning guess
    /// clears the slot, fires the win callback for `author`, and emits a
    /// congratulation; wrong guesses emit nothing so chat stays readable.
    /// Returns whether the message won a game.
    pub async fn on_message(&self, author: &str, text: &str) -> bool {
        let won = {
            let mut slot = self.slot.lock().unwrap();
            match slot.as_ref() {
                Some(game) if fuzzy::score(text, &game.answer) >= BROADCAST_MIN_SCORE => {
                    slot.take()
                },
                _ => None,
            }
        };
        let Some(game) = won else {
            return false;
        };

        tracing::info!(winner = author, kind = ?game.kind, "Broadcast game won");
        (self.award_win)(author.to_string()).await;
        let line = match game.kind {
            GameKind::Guess => format!("Correct, {author}! It was {}!", game.answer),
            GameKind::Trivia => format!("Correct, {author}!"),
            GameKind::Seasonal => format!("You got it, {author}!"),
        };
        say(&self.chat, line);
        true
    }
}

/// First character plus a `*` mask for the rest: `flour` → `f****`.
fn mask_hint(answer: &str) -> String {
    let mut chars = answer.chars();
    match chars.next() {
        Some(first) => {
            let masked: String = chars.map(|_| '*').collect();
            format!("{first}{masked}")
        },
        None => String::new(),
    }
}

/// Read the persisted season tag from storage metadata. Unset or
/// unrecognized tags mean no season.
pub async fn load_season<S: Storage>(store: &S) -> Option<Season> {
    let tag = store.get_metadata(SEASON_METADATA_KEY).await?;
    Season::from_tag(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use bakebot_core::test_helpers::{MemoryStorage, RecordedAwards, recording_hooks};

    fn fast_timings() -> BroadcastTimings {
        BroadcastTimings {
            guess: Duration::from_millis(100),
            trivia: Duration::from_millis(100),
            seasonal: Duration::from_millis(100),
        }
    }

    fn make_slot() -> (BroadcastSlot, mpsc::Receiver<String>, RecordedAwards) {
        let (tx, rx) = mpsc::channel(64);
        let (hooks, recorded) = recording_hooks(HashMap::new());
        let slot = BroadcastSlot::new(tx, hooks.award_win, fast_timings());
        (slot, rx, recorded)
    }

    async fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn hint_masks_all_but_first_char() {
        assert_eq!(mask_hint("flour"), "f****");
        assert_eq!(mask_hint("baking soda"), "b**********");
        assert_eq!(mask_hint(""), "");
    }

    #[tokio::test]
    async fn start_while_active_is_rejected_without_replacing() {
        let (slot, mut rx, _) = make_slot();
        assert!(slot.start_guess(None, Some("flour")));
        assert!(!slot.start_trivia());
        assert_eq!(slot.active_kind(), Some(GameKind::Guess));

        let lines = drain(&mut rx).await;
        assert!(lines[0].contains("Guess the Ingredient"));
        assert!(lines[1].contains("already running"));
        assert!(slot.time_remaining().is_some());

        // The original answer still wins: the reject did not swap state.
        assert!(slot.on_message("alice", "flour").await);
    }

    #[tokio::test]
    async fn correct_guess_wins_and_clears_the_slot() {
        let (slot, mut rx, recorded) = make_slot();
        assert!(slot.start_guess(None, Some("flour")));

        assert!(slot.on_message("alice", "Flour!!").await);
        assert_eq!(slot.active_kind(), None);
        assert_eq!(recorded.win_calls(), vec!["alice".to_string()]);

        let lines = drain(&mut rx).await;
        assert!(lines.last().unwrap().contains("Correct, alice"));
    }

    #[tokio::test]
    async fn wrong_guess_is_silent_and_keeps_the_game() {
        let (slot, mut rx, recorded) = make_slot();
        assert!(slot.start_guess(None, Some("flour")));
        drain(&mut rx).await;

        assert!(!slot.on_message("bob", "motor oil").await);
        assert_eq!(slot.active_kind(), Some(GameKind::Guess));
        assert!(recorded.win_calls().is_empty());
        assert!(drain(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn message_with_no_active_game_is_a_noop() {
        let (slot, mut rx, recorded) = make_slot();
        assert!(!slot.on_message("alice", "flour").await);
        assert!(recorded.win_calls().is_empty());
        assert!(drain(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn deadline_announces_the_answer_once() {
        let (slot, mut rx, _) = make_slot();
        assert!(slot.start_guess(None, Some("flour")));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(slot.active_kind(), None);

        let lines = drain(&mut rx).await;
        let expiries = lines.iter().filter(|l| l.contains("Time's up")).count();
        assert_eq!(expiries, 1);
        assert!(lines.last().unwrap().contains("flour"));
    }

    #[tokio::test]
    async fn stale_deadline_after_a_win_does_not_reannounce() {
        let (slot, mut rx, recorded) = make_slot();
        assert!(slot.start_guess(None, Some("flour")));
        assert!(slot.on_message("alice", "flour").await);

        // Let the (now stale) deadline timer fire.
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(recorded.win_calls().len(), 1);
        let lines = drain(&mut rx).await;
        assert!(!lines.iter().any(|l| l.contains("Time's up")));
    }

    #[tokio::test]
    async fn slot_is_reusable_after_expiry() {
        let (slot, _rx, _) = make_slot();
        assert!(slot.start_guess(None, Some("flour")));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(slot.start_trivia());
        assert_eq!(slot.active_kind(), Some(GameKind::Trivia));
    }

    #[tokio::test]
    async fn seasonal_pool_follows_the_season() {
        let (slot, mut rx, _) = make_slot();
        slot.set_season(Some(Season::Halloween));
        assert!(slot.start_seasonal());

        let lines = drain(&mut rx).await;
        assert!(lines[0].contains("Halloween Mystery Ingredient"));

        // The chosen answer comes from the halloween pool.
        let answer = slot.slot.lock().unwrap().as_ref().unwrap().answer.clone();
        let (_, pool) = pantry::seasonal_pool(Some(Season::Halloween));
        assert!(pool.contains(&answer.as_str()));
    }

    #[tokio::test]
    async fn trivia_win_uses_trivia_wording() {
        let (slot, mut rx, _) = make_slot();
        assert!(slot.start_trivia());
        let answer = slot.slot.lock().unwrap().as_ref().unwrap().answer.clone();

        assert!(slot.on_message("carol", &answer).await);
        let lines = drain(&mut rx).await;
        assert_eq!(lines.last().unwrap(), "Correct, carol!");
    }

    #[tokio::test]
    async fn season_round_trips_through_metadata() {
        let store = MemoryStorage::new();
        assert_eq!(load_season(&store).await, None);

        store.set_metadata(SEASON_METADATA_KEY, "holiday").await;
        assert_eq!(load_season(&store).await, Some(Season::Holiday));

        store.set_metadata(SEASON_METADATA_KEY, "").await;
        assert_eq!(load_season(&store).await, None);
    }
}
