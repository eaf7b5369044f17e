//! Player progression math shared by the duel engine and profile queries.
//!
//! These formulas are game-balance contracts; changing them changes how
//! fights play out for everyone.

use crate::question::Difficulty;

/// Minimum fuzzy score for a duel answer to land a hit.
pub const DUEL_MIN_SCORE: u8 = 75;

/// Level derived from lifetime XP: one level per 100 XP, floored at 1.
pub fn level_for_xp(xp: i64) -> u32 {
    (xp / 100).max(1) as u32
}

/// Starting (and maximum) health for a fighter of the given level.
pub fn max_health(level: u32) -> u32 {
    50 + level * 10
}

/// Base damage before accuracy and difficulty scaling.
pub fn base_damage(level: u32) -> u32 {
    10 + level * 2
}

/// Damage dealt by a landed answer.
///
/// `accuracy = 0.5 + score/100` (1.25x to 1.5x over the landing range) and
/// the difficulty bonus is `1 + difficulty * 0.3` (1.3x to 1.9x). The
/// product is floored to whole hit points.
pub fn damage(level: u32, score: u8, difficulty: Difficulty) -> u32 {
    debug_assert!(score >= DUEL_MIN_SCORE);
    let accuracy = 0.5 + f64::from(score) / 100.0;
    let bonus = 1.0 + f64::from(difficulty as u8) * 0.3;
    (f64::from(base_damage(level)) * accuracy * bonus).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_floors_at_one() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 1);
        assert_eq!(level_for_xp(250), 2);
        assert_eq!(level_for_xp(1000), 10);
    }

    #[test]
    fn health_scales_with_level() {
        assert_eq!(max_health(1), 60);
        assert_eq!(max_health(5), 100);
    }

    #[test]
    fn base_damage_scales_with_level() {
        assert_eq!(base_damage(1), 12);
        assert_eq!(base_damage(10), 30);
    }

    #[test]
    fn damage_formula_medium_difficulty() {
        // Level 1 => base 12; score 80 => accuracy 1.3; medium => 1.6.
        // floor(12 * 1.3 * 1.6) = floor(24.96) = 24.
        assert_eq!(damage(1, 80, Difficulty::Medium), 24);
    }

    #[test]
    fn damage_formula_extremes() {
        // Perfect score, hard question: floor(12 * 1.5 * 1.9) = 34.
        assert_eq!(damage(1, 100, Difficulty::Hard), 34);
        // Barely landed, easy question: floor(12 * 1.25 * 1.3) = 19.
        assert_eq!(damage(1, 75, Difficulty::Easy), 19);
    }

    #[test]
    fn higher_level_hits_harder() {
        assert!(damage(5, 90, Difficulty::Medium) > damage(1, 90, Difficulty::Medium));
    }
}
