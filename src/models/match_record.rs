//! Canonical match records.
//!
//! These are produced by the feed normalizer and consumed by the stats
//! engine. Every loosely-typed upstream field has already been resolved
//! into an explicit `Option` by the time a `MatchRecord` exists.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MatchId;

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    Unstarted,
    Upcoming,
    InProgress,
    Completed,
    Finished,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    /// Parse an upstream status string. Unrecognized values map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "unstarted" => MatchStatus::Unstarted,
            "upcoming" => MatchStatus::Upcoming,
            "inProgress" => MatchStatus::InProgress,
            "completed" => MatchStatus::Completed,
            "finished" => MatchStatus::Finished,
            _ => MatchStatus::Unknown,
        }
    }

    /// Whether the match is over. `completed` and `finished` are synonyms
    /// in upstream data.
    pub fn is_over(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Finished)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Unstarted => "unstarted",
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::InProgress => "inProgress",
            MatchStatus::Completed => "completed",
            MatchStatus::Finished => "finished",
            MatchStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Reported series outcome for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Some(Outcome::Win),
            "loss" => Some(Outcome::Loss),
            _ => None,
        }
    }
}

/// Best-of-N series format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SeriesFormat {
    best_of: u8,
}

impl SeriesFormat {
    pub fn best_of(games: u8) -> Self {
        Self {
            best_of: games.max(1),
        }
    }

    /// Parse strings such as `bo1`, `Bo3`, `BO5`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        let games: u8 = s.strip_prefix("bo")?.parse().ok()?;
        if games == 0 {
            return None;
        }
        Some(Self::best_of(games))
    }

    pub fn games(&self) -> u8 {
        self.best_of
    }
}

impl Default for SeriesFormat {
    fn default() -> Self {
        Self::best_of(1)
    }
}

impl fmt::Display for SeriesFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bo{}", self.best_of)
    }
}

impl From<SeriesFormat> for String {
    fn from(f: SeriesFormat) -> Self {
        f.to_string()
    }
}

impl TryFrom<String> for SeriesFormat {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SeriesFormat::parse(&s).ok_or_else(|| format!("invalid series format: {}", s))
    }
}

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResult {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Final game wins for the series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,

    /// Fallback for `score` when it is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_wins: Option<u32>,
}

impl TeamResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            code: None,
            score: None,
            outcome: None,
            game_wins: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn with_game_wins(mut self, game_wins: u32) -> Self {
        self.game_wins = Some(game_wins);
        self
    }

    /// `score` if present, else `gameWins`.
    pub fn resolved_score(&self) -> Option<u32> {
        self.score.or(self.game_wins)
    }

    /// Short label: the team code, else the first three letters of the
    /// name upper-cased, else `TBD`.
    pub fn short_label(&self) -> String {
        if let Some(code) = self.code.as_deref().filter(|c| !c.is_empty()) {
            return code.to_string();
        }
        let prefix: String = self.name.chars().take(3).collect();
        if prefix.is_empty() {
            "TBD".to_string()
        } else {
            prefix.to_uppercase()
        }
    }
}

/// A single scheduled or played match between two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchId,

    /// Used for chronological ordering; absent when upstream omitted it
    pub start_time: Option<DateTime<Utc>>,

    pub status: MatchStatus,

    /// League or tournament name
    pub league: String,

    #[serde(default)]
    pub format: SeriesFormat,

    /// Normally exactly two entries, tracked team in either position
    pub teams: Vec<TeamResult>,
}

impl MatchRecord {
    pub fn new(
        id: impl Into<MatchId>,
        start_time: Option<DateTime<Utc>>,
        status: MatchStatus,
        league: impl Into<String>,
        teams: Vec<TeamResult>,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            status,
            league: league.into(),
            format: SeriesFormat::default(),
            teams,
        }
    }

    pub fn with_format(mut self, format: SeriesFormat) -> Self {
        self.format = format;
        self
    }
}
