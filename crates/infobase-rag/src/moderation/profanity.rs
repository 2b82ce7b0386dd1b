//! Profanity detection
//!
//! English text goes through `rustrict`, which handles spacing tricks and
//! character substitutions over a large curated list. On top of it a local
//! wordlist covers French and any configured extra words. Text is split into
//! words first, then each word is checked as written and with common
//! substitutions undone.

use rustrict::{CensorStr, Type};
use std::collections::HashSet;

/// English words `rustrict` rates as mild, plus French entries
const WORDLIST: &[&str] = &[
    // English
    "arse", "bastard", "bollocks", "crap", "damn", "goddamn", "piss", "pissed",
    "shit", "shits", "shitty", "bitch", "fuck", "fucking",
    // French
    "bordel", "connard", "connasse", "conne", "couillon", "encule", "enculé",
    "enfoiré", "merde", "pute", "putain", "salope", "salaud", "ta gueule",
];

/// Profanity detector
pub struct ProfanityFilter {
    words: HashSet<String>,
    phrases: Vec<String>,
}

impl ProfanityFilter {
    /// Filter using only the bundled wordlist
    pub fn new() -> Self {
        Self::with_extra_words(&[])
    }

    /// Bundled wordlist plus `extra` words
    pub fn with_extra_words(extra: &[String]) -> Self {
        let mut words = HashSet::new();
        let mut phrases = Vec::new();

        let all = WORDLIST
            .iter()
            .map(|w| w.to_string())
            .chain(extra.iter().cloned());

        for entry in all {
            let entry = entry.trim().to_lowercase();
            if entry.is_empty() {
                continue;
            }
            if entry.contains(' ') {
                phrases.push(entry);
            } else {
                words.insert(entry);
            }
        }

        Self { words, phrases }
    }

    /// `true` if `text` is profane
    pub fn contains_profanity(&self, text: &str) -> bool {
        text.is(Type::PROFANE & Type::MODERATE_OR_HIGHER) || self.contains_listed(text)
    }

    /// `true` if any word or phrase of the local wordlist appears in `text`
    pub fn contains_listed(&self, text: &str) -> bool {
        let plain = words(&text.to_lowercase());
        let substituted = words(&undo_substitutions(text));

        if plain
            .iter()
            .chain(substituted.iter())
            .any(|word| self.words.contains(word.as_str()))
        {
            return true;
        }

        [plain, substituted].iter().any(|ws| {
            let padded = format!(" {} ", ws.join(" "));
            self.phrases
                .iter()
                .any(|phrase| padded.contains(&format!(" {} ", phrase)))
        })
    }
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Alphanumeric runs of `text`
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase and undo leetspeak substitutions. `!` only stands for `i`
/// inside a word, never as trailing punctuation.
fn undo_substitutions(text: &str) -> String {
    let lower: Vec<char> = text.to_lowercase().chars().collect();

    lower
        .iter()
        .enumerate()
        .map(|(i, &c)| match c {
            '@' | '4' => 'a',
            '$' | '5' => 's',
            '0' => 'o',
            '1' => 'i',
            '3' => 'e',
            '7' => 't',
            '!' if i > 0
                && lower[i - 1].is_alphanumeric()
                && lower.get(i + 1).map_or(false, |n| n.is_alphanumeric()) =>
            {
                'i'
            }
            other => other,
        })
        .collect()
}
