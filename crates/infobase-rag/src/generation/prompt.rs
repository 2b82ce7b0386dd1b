//! Prompt templates for answer generation

use crate::types::{Extract, Lang};

/// Prompt builder for extract summaries
pub struct PromptBuilder;

impl PromptBuilder {
    /// System instruction for the chat model
    pub fn system(lang: Lang) -> &'static str {
        match lang {
            Lang::En => {
                "You are a public health assistant for the Health Infobase website. \
                 You answer questions using ONLY the article extract you are given. \
                 Never add outside knowledge, never give personal medical advice, \
                 and never quote numbers, percentages or statistics."
            }
            Lang::Fr => {
                "Vous êtes un assistant en santé publique pour le site Infobase santé. \
                 Vous répondez aux questions en utilisant UNIQUEMENT l'extrait d'article fourni. \
                 N'ajoutez jamais de connaissances externes, ne donnez jamais de conseils \
                 médicaux personnels et ne citez jamais de nombres, de pourcentages ni de statistiques."
            }
        }
    }

    /// User prompt holding the extract and the question
    pub fn answer_prompt(query: &str, extract: &Extract, lang: Lang) -> String {
        match lang {
            Lang::En => format!(
                r#"Here is an extract from the article "{title}":

<extract>
{content}
</extract>

Using only this extract, answer the question below in a short paragraph of plain English.
If the extract does not answer the question, say that the article does not cover it.

Question: {query}"#,
                title = extract.metadata.title,
                content = extract.page_content,
                query = query
            ),
            Lang::Fr => format!(
                r#"Voici un extrait de l'article « {title} » :

<extract>
{content}
</extract>

En utilisant uniquement cet extrait, répondez à la question ci-dessous en un court paragraphe en français.
Si l'extrait ne répond pas à la question, dites que l'article ne traite pas de ce sujet.

Question : {query}"#,
                title = extract.metadata.title,
                content = extract.page_content,
                query = query
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleMetadata;

    #[test]
    fn test_prompt_languages() {
        let extract = Extract::new(
            "Le tabagisme est en baisse.",
            ArticleMetadata::new("Tabagisme", "https://example.org/tabac", "", "2023-06-01"),
        );

        let fr = PromptBuilder::answer_prompt("Le tabagisme baisse-t-il?", &extract, Lang::Fr);
        assert!(fr.contains("« Tabagisme »"));
        assert!(fr.contains("Le tabagisme est en baisse."));
        assert!(fr.contains("Question : Le tabagisme baisse-t-il?"));

        let en = PromptBuilder::answer_prompt("Is smoking declining?", &extract, Lang::En);
        assert!(en.contains("Question: Is smoking declining?"));
        assert_ne!(PromptBuilder::system(Lang::En), PromptBuilder::system(Lang::Fr));
    }
}
