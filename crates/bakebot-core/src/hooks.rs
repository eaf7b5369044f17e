//! Injected async callbacks through which the game engine reaches storage.
//!
//! The engine never mutates storage directly: it fires these hooks on game
//! events and the surrounding system decides what they mean.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::storage::Storage;

/// XP granted to the losing side of a duel for showing up.
pub const PARTICIPATION_XP: i64 = 1;
/// XP granted for winning a game.
pub const WIN_XP: i64 = 25;
/// Tokens granted for winning a game.
pub const WIN_TOKENS: i64 = 5;

/// An injected award callback, invoked with the recipient's username.
pub type AwardFn = Arc<dyn Fn(String) -> BoxFuture<'static, ()> + Send + Sync>;

/// An injected XP lookup, used to derive duel levels.
pub type XpLookupFn = Arc<dyn Fn(String) -> BoxFuture<'static, i64> + Send + Sync>;

/// The full set of callbacks the game engine is constructed with.
#[derive(Clone)]
pub struct RewardHooks {
    pub award_participation: AwardFn,
    pub award_win: AwardFn,
    pub lookup_xp: XpLookupFn,
}

/// Standard hooks over a storage backend: participation is a consolation
/// +1 XP, a win pays out XP, tokens, and a recorded win.
pub fn hooks_from_storage<S>(store: Arc<S>) -> RewardHooks
where
    S: Storage + 'static,
{
    let participation_store = Arc::clone(&store);
    let award_participation: AwardFn = Arc::new(move |user: String| {
        let store = Arc::clone(&participation_store);
        async move {
            store.add_xp(&user, PARTICIPATION_XP).await;
        }
        .boxed()
    });

    let win_store = Arc::clone(&store);
    let award_win: AwardFn = Arc::new(move |user: String| {
        let store = Arc::clone(&win_store);
        async move {
            store.add_xp(&user, WIN_XP).await;
            store.add_tokens(&user, WIN_TOKENS).await;
            store.add_win(&user).await;
        }
        .boxed()
    });

    let lookup_store = Arc::clone(&store);
    let lookup_xp: XpLookupFn = Arc::new(move |user: String| {
        let store = Arc::clone(&lookup_store);
        async move { store.get_or_create_user(&user).await.xp }.boxed()
    });

    RewardHooks {
        award_participation,
        award_win,
        lookup_xp,
    }
}
