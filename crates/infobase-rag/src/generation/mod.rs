//! Answer generation from the best-matching extract

pub mod prompt;

pub use prompt::PromptBuilder;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::types::{Extract, Lang};

/// Ask the model to answer `query` from `extract` alone
pub async fn generate_answer(
    query: &str,
    extract: &Extract,
    llm: &dyn LlmProvider,
    lang: Lang,
) -> Result<String> {
    let system = PromptBuilder::system(lang);
    let prompt = PromptBuilder::answer_prompt(query, extract, lang);

    tracing::debug!("Generating answer with {} ({})", llm.name(), llm.model());
    let answer = llm.complete(system, &prompt).await?;
    Ok(answer.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::CannedLlm;
    use crate::types::ArticleMetadata;

    #[tokio::test]
    async fn test_generate_answer_trims_and_uses_extract() {
        let llm = CannedLlm::replying("  Wash your hands often.\n");
        let extract = Extract::new(
            "Hand hygiene prevents the spread of infection.",
            ArticleMetadata::new("Hand hygiene", "https://example.org/hands", "", "2023-01-01"),
        );

        let answer = generate_answer("How do I avoid the flu?", &extract, &llm, Lang::En)
            .await
            .unwrap();
        assert_eq!(answer, "Wash your hands often.");

        let prompts = llm.prompts.lock();
        assert!(prompts[0].contains("Hand hygiene prevents the spread of infection."));
        assert!(prompts[0].contains("How do I avoid the flu?"));
    }

    #[tokio::test]
    async fn test_generate_answer_propagates_errors() {
        let llm = CannedLlm::failing();
        let extract = Extract::new("text", ArticleMetadata::new("t", "", "", ""));
        assert!(generate_answer("q", &extract, &llm, Lang::Fr).await.is_err());
    }
}
