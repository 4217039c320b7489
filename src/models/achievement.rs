//! Achievement records.

use serde::{Deserialize, Serialize};

use super::Lang;

/// How rare an achievement is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Localized label.
    pub fn label(&self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Rarity::Common, Lang::Es) => "Común",
            (Rarity::Common, Lang::En) => "Common",
            (Rarity::Rare, Lang::Es) => "Raro",
            (Rarity::Rare, Lang::En) => "Rare",
            (Rarity::Epic, Lang::Es) => "Épico",
            (Rarity::Epic, Lang::En) => "Epic",
            (Rarity::Legendary, Lang::Es) => "Legendario",
            (Rarity::Legendary, Lang::En) => "Legendary",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "common"),
            Rarity::Rare => write!(f, "rare"),
            Rarity::Epic => write!(f, "epic"),
            Rarity::Legendary => write!(f, "legendary"),
        }
    }
}

/// An unlocked achievement or a locked placeholder showing progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub unlocked: bool,
    pub rarity: Rarity,
    pub progress: u32,
    pub max: u32,
}

impl Achievement {
    /// Progress as a percentage, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        (self.progress as f64 / self.max as f64 * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(progress: u32, max: u32) -> Achievement {
        Achievement {
            id: "fire-streak-locked".to_string(),
            icon: "🔒".to_string(),
            title: "Fire Streak".to_string(),
            description: "5 consecutive wins".to_string(),
            unlocked: false,
            rarity: Rarity::Rare,
            progress,
            max,
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(sample(2, 5).progress_percent(), 40.0);
        assert_eq!(sample(12, 10).progress_percent(), 100.0);
        assert_eq!(sample(3, 0).progress_percent(), 0.0);
    }

    #[test]
    fn test_rarity_labels() {
        assert_eq!(Rarity::Legendary.label(Lang::Es), "Legendario");
        assert_eq!(Rarity::Epic.label(Lang::En), "Epic");
        assert_eq!(Rarity::Rare.to_string(), "rare");
    }

    #[test]
    fn test_rarity_serializes_lowercase() {
        let json = serde_json::to_value(sample(0, 5)).unwrap();
        assert_eq!(json["rarity"], "rare");
        assert_eq!(json["unlocked"], false);
    }
}
