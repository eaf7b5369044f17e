//! Typo-tolerant answer matching used by every guessing mechanic.

/// Strip a chat message down to the characters that matter for matching:
/// lowercase, alphanumeric and spaces only, trimmed.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Similarity of two strings as a 0 to 100 percentage over their normalized
/// forms. 100 means an exact match after normalization.
pub fn score(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() && b.is_empty() {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (strsim::normalized_levenshtein(&a, &b) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Flour!!"), normalize("flour"));
        assert_eq!(normalize("  Baking Soda. "), "baking soda");
    }

    #[test]
    fn normalize_keeps_inner_spaces() {
        assert_eq!(normalize("candy corn"), "candy corn");
    }

    #[test]
    fn exact_match_scores_100() {
        assert_eq!(score("flour", "flour"), 100);
        assert_eq!(score("Flour!!", "flour"), 100);
    }

    #[test]
    fn close_typo_scores_high() {
        assert!(score("fluor", "flour") >= 60);
        assert!(score("yeast", "yeast!") == 100);
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(score("pumpkin", "eggnog") < 50);
    }

    #[test]
    fn empty_against_nonempty_scores_zero() {
        assert_eq!(score("", "flour"), 0);
        assert_eq!(score("!!!", "flour"), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_is_bounded(a in ".{0,40}", b in ".{0,40}") {
                prop_assert!(score(&a, &b) <= 100);
            }

            #[test]
            fn score_is_symmetric(a in "[a-z ]{0,20}", b in "[a-z ]{0,20}") {
                prop_assert_eq!(score(&a, &b), score(&b, &a));
            }

            #[test]
            fn normalize_is_idempotent(s in ".{0,40}") {
                let once = normalize(&s);
                prop_assert_eq!(normalize(&once), once);
            }

            #[test]
            fn self_score_is_100(s in "[a-z][a-z0-9 ]{0,20}") {
                prop_assert_eq!(score(&s, &s), 100);
            }
        }
    }
}
