//! Numeric-statistic heuristic for generated answers
//!
//! Models summarizing an article tend to invent figures. Answers are only
//! shown when every number in them is harmless: a recent year, or a short
//! number that is likely an age, a month or a day.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.\s*").expect("valid regex"));

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid regex"));

/// `true` when the answer contains no numeric statistics
pub fn no_stats(answer: &str) -> bool {
    if answer.contains('%') {
        return false;
    }

    let answer = answer.replace("COVID-19", "");
    let answer = NUMBERED_BULLET.replace_all(&answer, "");

    NUMBER
        .find_iter(&answer)
        .all(|m| is_allowed_number(m.as_str()))
}

/// Years 2000-2030 and numbers under three digits
fn is_allowed_number(num: &str) -> bool {
    let digits = num.chars().count();

    if digits < 5 {
        if let Some(rest) = num.strip_prefix("20") {
            if rest.parse::<u32>().map_or(false, |n| n <= 30) {
                return true;
            }
        }
    }

    digits < 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_percentage() {
        assert!(!no_stats("Cases rose to 45%"));
        assert!(!no_stats("Rates climbed by a few % points"));
    }

    #[test]
    fn test_covid_19_is_not_a_number() {
        assert!(no_stats("In COVID-19, cases dropped"));
    }

    #[test]
    fn test_years() {
        assert!(no_stats("In 2024 there were big changes"));
        assert!(no_stats("Between 2000 and 2030 the plan runs"));
        assert!(!no_stats("Back in 2031 things changed"));
        assert!(!no_stats("In 1999 there were fewer"));
    }

    #[test]
    fn test_bare_numbers() {
        assert!(!no_stats("There were 4500 cases"));
        assert!(!no_stats("About 150 people attended"));
        assert!(no_stats("Children aged 12 to 17 were surveyed"));
        assert!(no_stats("The number 20 on its own is fine"));
    }

    #[test]
    fn test_numbered_bullets() {
        let answer = "Key points:\n100. Wash your hands\n101. Stay home when sick";
        assert!(no_stats(answer));
        assert!(!no_stats("Key points: 100. Wash your hands"));
    }

    proptest! {
        #[test]
        fn prop_short_numbers_allowed(n in 0u32..100) {
            let text = format!("Children aged {} were included", n);
            prop_assert!(no_stats(&text));
        }

        #[test]
        fn prop_large_numbers_rejected(n in 3100u32..1_000_000) {
            let text = format!("There were {} hospitalizations", n);
            prop_assert!(!no_stats(&text));
        }
    }
}
