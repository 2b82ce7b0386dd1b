//! Query validation and generated-answer filters

pub mod profanity;
pub mod query;
pub mod stats;

pub use profanity::ProfanityFilter;
pub use query::{validate_query, QueryRejection};
pub use stats::no_stats;

use crate::config::ModerationConfig;

/// Why a generated answer was not shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerRejection {
    TooShort,
    ContainsStatistics,
    Profanity,
}

/// Checks a generated answer before it reaches the user
pub struct AnswerGuard {
    min_chars: usize,
    profanity: ProfanityFilter,
}

impl AnswerGuard {
    pub fn new(config: &ModerationConfig) -> Self {
        Self {
            min_chars: config.min_answer_chars,
            profanity: ProfanityFilter::with_extra_words(&config.extra_profanity),
        }
    }

    /// Accept answers longer than the minimum, free of numeric statistics
    /// and free of profanity
    pub fn check(&self, answer: &str) -> Result<(), AnswerRejection> {
        if answer.chars().count() <= self.min_chars {
            return Err(AnswerRejection::TooShort);
        }
        if !no_stats(answer) {
            return Err(AnswerRejection::ContainsStatistics);
        }
        if self.profanity.contains_profanity(answer) {
            return Err(AnswerRejection::Profanity);
        }
        Ok(())
    }

    pub fn accept(&self, answer: &str) -> bool {
        self.check(answer).is_ok()
    }
}

impl Default for AnswerGuard {
    fn default() -> Self {
        Self::new(&ModerationConfig::default())
    }
}
