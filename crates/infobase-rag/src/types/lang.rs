//! Request language

use serde::{Deserialize, Serialize};

/// Language of a request. Drives localized error bodies and prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Fr,
}

impl Lang {
    /// Parse the `lang` query parameter. Anything but `fr` is English.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(value) if value.trim().eq_ignore_ascii_case("fr") => Lang::Fr,
            _ => Lang::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Fr => "fr",
        }
    }

    /// Shown when a generated answer fails moderation
    pub fn no_answer(&self) -> &'static str {
        match self {
            Lang::En => "Sorry, I don't have an answer for that.",
            Lang::Fr => "Désolé, je n'ai pas de réponse à cette question.",
        }
    }
}
