//! Query validation for the retrieval endpoint

use once_cell::sync::Lazy;
use regex::Regex;

/// Punctuation that only shows up in code or injection attempts
static CODE_CHARACTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[;`{}#*\[\]\\|]|--|//").expect("valid regex"));

/// Why a query was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRejection {
    /// Missing or blank
    Missing,
    /// Contains code-like punctuation
    CodeCharacters,
    /// Longer than the configured maximum
    TooLong,
}

/// Validate a raw `query` parameter, checking presence, then punctuation,
/// then length (in characters).
pub fn validate_query(query: Option<&str>, max_chars: usize) -> Result<&str, QueryRejection> {
    let query = match query {
        Some(q) if !q.is_empty() => q,
        _ => return Err(QueryRejection::Missing),
    };

    if CODE_CHARACTERS.is_match(query) {
        return Err(QueryRejection::CodeCharacters);
    }

    if query.chars().count() > max_chars {
        return Err(QueryRejection::TooLong);
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_questions() {
        let q = "What are the largest challenges to teenagers' mental health?";
        assert_eq!(validate_query(Some(q), 300), Ok(q));
        assert!(validate_query(Some("COVID-19 vaccines for kids"), 300).is_ok());
        assert!(validate_query(Some("Quels sont les effets du tabac?"), 300).is_ok());
    }

    #[test]
    fn test_missing() {
        assert_eq!(validate_query(None, 300), Err(QueryRejection::Missing));
        assert_eq!(validate_query(Some(""), 300), Err(QueryRejection::Missing));
    }

    #[test]
    fn test_code_characters() {
        for q in [
            "drop table; --",
            "x -- y",
            "<script>//",
            "a | b",
            "{\"$ne\": 1}",
            "#include",
            "SELECT *",
            "arr[0]",
            "back\\slash",
            "`ls`",
        ] {
            assert_eq!(
                validate_query(Some(q), 300),
                Err(QueryRejection::CodeCharacters),
                "{}",
                q
            );
        }
    }

    #[test]
    fn test_too_long_counts_chars() {
        let q = "é".repeat(300);
        assert!(validate_query(Some(&q), 300).is_ok());
        let q = "a".repeat(301);
        assert_eq!(validate_query(Some(&q), 300), Err(QueryRejection::TooLong));
    }

    #[test]
    fn test_punctuation_checked_before_length() {
        let q = format!("{};", "a".repeat(400));
        assert_eq!(validate_query(Some(&q), 300), Err(QueryRejection::CodeCharacters));
    }
}
