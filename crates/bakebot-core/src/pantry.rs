//! Answer pools for the broadcast mini-games.

use std::fmt;

/// Active seasonal theme. Set by the broadcaster; `None` uses the default
/// seasonal pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Halloween,
    Holiday,
}

impl Season {
    /// Parse the tag the broadcaster types (and the persisted metadata
    /// value). Anything unrecognized means no season.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "halloween" => Some(Self::Halloween),
            "holiday" => Some(Self::Holiday),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halloween => write!(f, "halloween"),
            Self::Holiday => write!(f, "holiday"),
        }
    }
}

/// Default pool for guess-the-ingredient.
pub const INGREDIENTS: &[&str] = &[
    "flour",
    "sugar",
    "butter",
    "eggs",
    "vanilla",
    "baking soda",
    "salt",
    "cocoa powder",
];

/// Oven-timer trivia questions and their accepted answers.
pub const TRIVIA: &[(&str, &str)] = &[
    ("What temp (F) is commonly used to bake cookies?", "350"),
    ("What ingredient makes bread rise?", "yeast"),
    ("What does baking soda need to activate?", "acid"),
];

/// Seasonal event pool and round title for the given season.
pub fn seasonal_pool(season: Option<Season>) -> (&'static str, &'static [&'static str]) {
    match season {
        Some(Season::Halloween) => (
            "Halloween Mystery Ingredient",
            &["pumpkin", "cinnamon", "nutmeg", "candy corn"],
        ),
        Some(Season::Holiday) => (
            "Holiday Secret Ingredient",
            &["ginger", "peppermint", "cranberry", "eggnog"],
        ),
        None => (
            "Seasonal Surprise Ingredient",
            &["honey", "lemon", "almond", "oat"],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_tags_round_trip() {
        for season in [Season::Halloween, Season::Holiday] {
            assert_eq!(Season::from_tag(&season.to_string()), Some(season));
        }
        assert_eq!(Season::from_tag("HALLOWEEN"), Some(Season::Halloween));
        assert_eq!(Season::from_tag("none"), None);
        assert_eq!(Season::from_tag(""), None);
    }

    #[test]
    fn every_pool_is_nonempty() {
        assert!(!INGREDIENTS.is_empty());
        assert!(!TRIVIA.is_empty());
        for season in [None, Some(Season::Halloween), Some(Season::Holiday)] {
            let (title, pool) = seasonal_pool(season);
            assert!(!title.is_empty());
            assert!(!pool.is_empty());
        }
    }
}
