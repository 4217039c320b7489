//! Display language for user-facing text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported languages. Spanish is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Es,
    En,
}

impl Lang {
    /// Parse a language tag. Anything that is not English falls back to
    /// Spanish, including region-suffixed tags like `es-MX`.
    pub fn parse(tag: &str) -> Self {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or("");
        if primary.eq_ignore_ascii_case("en") {
            Lang::En
        } else {
            Lang::Es
        }
    }

    /// Pick the variant of a string pair for this language.
    pub fn pick<'a>(&self, es: &'a str, en: &'a str) -> &'a str {
        match self {
            Lang::Es => es,
            Lang::En => en,
        }
    }

    /// Localized "no statistics available" message.
    pub fn no_stats_message(&self) -> &'static str {
        match self {
            Lang::Es => "📊 No hay estadísticas disponibles aún",
            Lang::En => "📊 No statistics available yet",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lang::Es => write!(f, "es"),
            Lang::En => write!(f, "en"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Lang::parse("en"), Lang::En);
        assert_eq!(Lang::parse("EN-us"), Lang::En);
        assert_eq!(Lang::parse("es"), Lang::Es);
        assert_eq!(Lang::parse("fr"), Lang::Es);
        assert_eq!(Lang::parse(""), Lang::Es);
    }

    #[test]
    fn test_pick() {
        assert_eq!(Lang::Es.pick("Victorias", "Wins"), "Victorias");
        assert_eq!(Lang::En.pick("Victorias", "Wins"), "Wins");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Lang::En).unwrap(), "\"en\"");
        let l: Lang = serde_json::from_str("\"es\"").unwrap();
        assert_eq!(l, Lang::Es);
    }
}
