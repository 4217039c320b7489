//! Statistics calculation engine.
//!
//! Derives team statistics from a snapshot of match records:
//! - Win/loss classification per match
//! - Current and best streaks
//! - Per-league win rates
//! - Achievement unlocking
//!
//! Everything here is pure and synchronous. Callers recompute from scratch
//! whenever their match collection changes.

pub mod achievements;
pub mod outcome;
pub mod streaks;
pub mod tournaments;

pub use achievements::evaluate_achievements;
pub use outcome::{classify_history, classify_outcome, ClassifiedMatch, Classification};
pub use streaks::compute_streaks;
pub use tournaments::{aggregate_by_tournament, tournament_breakdown};

use crate::models::{
    Achievement, DerivedStats, EvolutionPoint, FormEntry, Lang, MatchRecord, MatchSummary,
    TrackedTeam,
};

/// Number of matches in the recent-form strip.
pub const RECENT_FORM_LEN: usize = 10;

/// Target number of points in the winrate evolution series.
pub const EVOLUTION_POINTS: usize = 20;

/// Win rate as a percentage (0-100). Zero when there are no games.
pub fn calculate_win_rate(wins: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64 * 100.0
    }
}

/// Round to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute stats for the tracked team.
///
/// Returns `None` when no finished match can be classified.
pub fn compute_stats(matches: &[MatchRecord], team: &TrackedTeam) -> Option<DerivedStats> {
    let history = classify_history(matches, team);
    if history.is_empty() {
        return None;
    }
    Some(summarize(&history))
}

/// Build stats from a chronological (oldest first) classified history.
pub fn summarize(history: &[ClassifiedMatch]) -> DerivedStats {
    let outcomes: Vec<bool> = history.iter().map(|m| m.win).collect();
    let wins = outcomes.iter().filter(|&&w| w).count() as u32;
    let total_games = outcomes.len() as u32;
    let streaks = compute_streaks(&outcomes, false);

    DerivedStats {
        wins,
        losses: total_games - wins,
        total_games,
        winrate: round_one_decimal(calculate_win_rate(wins, total_games)),
        current_streak: streaks.current,
        current_streak_type: streaks.current_type,
        best_win_streak: streaks.best_win,
        best_loss_streak: streaks.best_loss,
        tournament_stats: tournament_breakdown(history),
        last_match: history.last().map(match_summary),
        recent_form: recent_form(history),
        winrate_evolution: winrate_evolution(history),
    }
}

/// The last few results, oldest first.
pub fn recent_form(history: &[ClassifiedMatch]) -> Vec<FormEntry> {
    let start = history.len().saturating_sub(RECENT_FORM_LEN);
    history[start..]
        .iter()
        .map(|m| FormEntry {
            opponent: m.opponent_label.clone(),
            win: m.win,
            start_time: m.start_time,
        })
        .collect()
}

/// Cumulative record after each match, thinned to about
/// [`EVOLUTION_POINTS`] points. The final point is always kept.
pub fn winrate_evolution(history: &[ClassifiedMatch]) -> Vec<EvolutionPoint> {
    let n = history.len();
    let step = if n <= EVOLUTION_POINTS {
        1
    } else {
        n.div_ceil(EVOLUTION_POINTS)
    };

    let mut wins = 0;
    let mut losses = 0;
    let mut points = Vec::new();

    for (idx, m) in history.iter().enumerate() {
        if m.win {
            wins += 1;
        } else {
            losses += 1;
        }

        if idx % step == 0 || idx == n - 1 {
            points.push(EvolutionPoint {
                match_id: m.id.clone(),
                start_time: m.start_time,
                wins,
                losses,
                winrate: round_one_decimal(calculate_win_rate(wins, wins + losses)),
            });
        }
    }

    points
}

fn match_summary(m: &ClassifiedMatch) -> MatchSummary {
    MatchSummary {
        id: m.id.clone(),
        start_time: m.start_time,
        league: m.league.clone(),
        opponent: m.opponent_name.clone(),
        tracked_score: m.tracked_score,
        opponent_score: m.opponent_score,
        win: m.win,
    }
}

/// Stats engine bound to one tracked team.
#[derive(Debug, Clone)]
pub struct StatsEngine {
    team: TrackedTeam,
}

impl StatsEngine {
    pub fn new(team: TrackedTeam) -> Self {
        Self { team }
    }

    pub fn team(&self) -> &TrackedTeam {
        &self.team
    }

    /// Derived stats, or `None` when there is nothing to report.
    pub fn stats(&self, matches: &[MatchRecord]) -> Option<DerivedStats> {
        compute_stats(matches, &self.team)
    }

    /// Unlocked achievements and locked placeholders.
    pub fn achievements(&self, matches: &[MatchRecord], lang: Lang) -> Vec<Achievement> {
        evaluate_achievements(&classify_history(matches, &self.team), lang)
    }
}
