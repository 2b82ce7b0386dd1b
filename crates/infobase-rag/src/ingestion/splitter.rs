//! Recursive character text splitting
//!
//! Text is split on the coarsest separator present (paragraphs, then lines,
//! then words, then characters). Pieces still larger than the chunk size are
//! split again with the finer separators, and small pieces are merged back
//! up to the chunk size. Lengths are counted in characters.

use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text into chunks of at most `chunk_size` characters
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter. Overlap is capped below the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split `text` into trimmed, non-empty chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (index, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(**sep))
            .map(|(i, sep)| (i, *sep))
            .unwrap_or((separators.len().saturating_sub(1), ""));
        let finer = &separators[(index + 1).min(separators.len())..];

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut small = Vec::new();
        for piece in pieces {
            if char_len(&piece) < self.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge(&small, separator));
                small.clear();
            }
            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, finer));
            }
        }
        if !small.is_empty() {
            chunks.extend(self.merge(&small, separator));
        }
        chunks
    }

    /// Join pieces with `separator` into chunks, carrying up to
    /// `chunk_overlap` characters of trailing pieces into the next chunk
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            let joined_len = |window: &VecDeque<&str>, total: usize| {
                total + len + if window.is_empty() { 0 } else { sep_len }
            };

            if joined_len(&window, total) > self.chunk_size && !window.is_empty() {
                push_chunk(&mut chunks, &window, separator);

                while total > self.chunk_overlap
                    || (total > 0 && joined_len(&window, total) > self.chunk_size)
                {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    total -= char_len(front) + if window.is_empty() { 0 } else { sep_len };
                }
            }

            total += len + if window.is_empty() { 0 } else { sep_len };
            window.push_back(piece);
        }

        push_chunk(&mut chunks, &window, separator);
        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let splitter = TextSplitter::new(5000, 0);
        assert_eq!(
            splitter.split("  Flu season starts in the fall.  "),
            vec!["Flu season starts in the fall."]
        );
        assert!(splitter.split("   ").is_empty());
    }

    #[test]
    fn test_prefers_paragraphs() {
        let splitter = TextSplitter::new(30, 0);
        let text = "First paragraph here.\n\nSecond paragraph here.";
        assert_eq!(
            splitter.split(text),
            vec!["First paragraph here.", "Second paragraph here."]
        );
    }

    #[test]
    fn test_falls_back_to_words() {
        let splitter = TextSplitter::new(12, 0);
        let chunks = splitter.split("alpha beta gamma delta epsilon");
        assert_eq!(chunks, vec!["alpha beta", "gamma delta", "epsilon"]);
    }

    #[test]
    fn test_overlap_repeats_trailing_words() {
        let splitter = TextSplitter::new(12, 6);
        let chunks = splitter.split("alpha beta gamma delta");
        assert_eq!(chunks, vec!["alpha beta", "beta gamma", "gamma delta"]);
    }

    #[test]
    fn test_unbroken_text_splits_by_characters() {
        let splitter = TextSplitter::new(4, 0);
        assert_eq!(splitter.split("abcdefghij"), vec!["abcd", "efgh", "ij"]);
    }

    proptest! {
        #[test]
        fn chunks_never_exceed_size(text in "[a-zé \n]{0,400}", size in 5usize..60) {
            let splitter = TextSplitter::new(size, 0);
            for chunk in splitter.split(&text) {
                prop_assert!(chunk.chars().count() <= size);
                prop_assert!(!chunk.is_empty());
            }
        }

        #[test]
        fn no_overlap_preserves_words(text in "[a-z]{1,8}( [a-z]{1,8}){0,40}") {
            let splitter = TextSplitter::new(20, 0);
            let rejoined = splitter.split(&text).join(" ");
            prop_assert_eq!(rejoined, text);
        }
    }
}
