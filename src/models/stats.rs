//! Derived statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MatchId;

/// Kind of run a streak describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakType {
    Win,
    Loss,
}

impl StreakType {
    pub fn from_win(win: bool) -> Self {
        if win {
            StreakType::Win
        } else {
            StreakType::Loss
        }
    }

    /// Compact suffix used in records such as `3W` / `2L`.
    pub fn suffix(&self) -> char {
        match self {
            StreakType::Win => 'W',
            StreakType::Loss => 'L',
        }
    }
}

impl std::fmt::Display for StreakType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreakType::Win => write!(f, "win"),
            StreakType::Loss => write!(f, "loss"),
        }
    }
}

/// Current and historical streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Length of the run ending at the most recent match
    pub current: u32,

    /// `None` when there are no matches
    pub current_type: Option<StreakType>,

    pub best_win: u32,
    pub best_loss: u32,
}

/// Win/loss breakdown for one league or tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentStat {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,

    /// Percentage, one decimal place
    pub winrate: f64,
}

/// Compact view of a classified match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: MatchId,
    pub start_time: Option<DateTime<Utc>>,
    pub league: String,
    pub opponent: String,
    pub tracked_score: u32,
    pub opponent_score: u32,
    pub win: bool,
}

/// One entry of the recent-form strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEntry {
    /// Opponent code or short label
    pub opponent: String,
    pub win: bool,
    pub start_time: Option<DateTime<Utc>>,
}

/// Cumulative record after a given match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionPoint {
    pub match_id: MatchId,
    pub start_time: Option<DateTime<Utc>>,
    pub wins: u32,
    pub losses: u32,
    pub winrate: f64,
}

/// Statistics derived from a team's match history.
///
/// Recomputed from scratch whenever the input collection changes; it has
/// no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,

    /// Percentage, one decimal place; `0.0` when no games
    pub winrate: f64,

    pub current_streak: u32,
    pub current_streak_type: Option<StreakType>,
    pub best_win_streak: u32,
    pub best_loss_streak: u32,

    /// Sorted by `total`, most played first
    pub tournament_stats: Vec<TournamentStat>,

    pub last_match: Option<MatchSummary>,

    /// Up to the last 10 matches, oldest first
    pub recent_form: Vec<FormEntry>,

    pub winrate_evolution: Vec<EvolutionPoint>,
}

impl DerivedStats {
    /// Streak fields as a summary.
    pub fn streaks(&self) -> StreakSummary {
        StreakSummary {
            current: self.current_streak,
            current_type: self.current_streak_type,
            best_win: self.best_win_streak,
            best_loss: self.best_loss_streak,
        }
    }
}
