//! Win/loss classification of individual matches.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::models::{MatchId, MatchRecord, Outcome, TrackedTeam};

/// Result of classifying one match from the tracked team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub win: bool,
    pub tracked_score: u32,
    pub opponent_score: u32,
}

/// A completed match with its outcome resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMatch {
    pub id: MatchId,
    pub start_time: Option<DateTime<Utc>>,
    pub league: String,
    pub opponent_name: String,
    /// Opponent code, or a short label derived from the name
    pub opponent_label: String,
    pub tracked_score: u32,
    pub opponent_score: u32,
    pub win: bool,
}

/// Classify a match as a win or loss for the tracked team.
///
/// Scores come from `score`, falling back to `gameWins`. When only one side
/// has a numeric score the other counts as 0. When neither side has one,
/// the reported `outcome` is used. Equal scores classify as a loss.
///
/// Returns `None` when the match does not have exactly two teams, the
/// tracked team cannot be located, or no outcome can be derived. Status is
/// not checked here.
pub fn classify_outcome(m: &MatchRecord, team: &TrackedTeam) -> Option<Classification> {
    if m.teams.len() != 2 {
        trace!(match_id = %m.id, teams = m.teams.len(), "skipping match without two teams");
        return None;
    }

    let Some(idx) = team.locate(&m.teams) else {
        trace!(match_id = %m.id, "tracked team not found");
        return None;
    };
    let tracked = &m.teams[idx];
    let opponent = &m.teams[1 - idx];

    match (tracked.resolved_score(), opponent.resolved_score()) {
        (None, None) => {
            let win = match (tracked.outcome, opponent.outcome) {
                (Some(o), _) => o == Outcome::Win,
                (None, Some(o)) => o == Outcome::Loss,
                (None, None) => {
                    trace!(match_id = %m.id, "no score or outcome");
                    return None;
                }
            };
            Some(Classification {
                win,
                tracked_score: 0,
                opponent_score: 0,
            })
        }
        (t, o) => {
            let tracked_score = t.unwrap_or(0);
            let opponent_score = o.unwrap_or(0);
            Some(Classification {
                win: tracked_score > opponent_score,
                tracked_score,
                opponent_score,
            })
        }
    }
}

/// Classify every finished match, oldest first.
///
/// Matches that are not over or cannot be classified are dropped. Matches
/// without a start time sort before dated ones; ties keep input order.
pub fn classify_history(matches: &[MatchRecord], team: &TrackedTeam) -> Vec<ClassifiedMatch> {
    let mut finished: Vec<&MatchRecord> = matches.iter().filter(|m| m.status.is_over()).collect();
    finished.sort_by_key(|m| m.start_time);

    finished
        .into_iter()
        .filter_map(|m| {
            let c = classify_outcome(m, team)?;
            // classify_outcome guarantees two teams and a located index
            let idx = team.locate(&m.teams)?;
            let opponent = &m.teams[1 - idx];
            Some(ClassifiedMatch {
                id: m.id.clone(),
                start_time: m.start_time,
                league: m.league.clone(),
                opponent_name: opponent.name.clone(),
                opponent_label: opponent.short_label(),
                tracked_score: c.tracked_score,
                opponent_score: c.opponent_score,
                win: c.win,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FallbackPolicy, MatchStatus, TeamResult};
    use chrono::TimeZone;

    fn flyquest() -> TrackedTeam {
        TrackedTeam::new(
            Some("flyquest".to_string()),
            Some("FLY".to_string()),
            Some("FlyQuest".to_string()),
            FallbackPolicy::FirstTeam,
        )
    }

    fn completed(id: &str, day: u32, teams: Vec<TeamResult>) -> MatchRecord {
        MatchRecord::new(
            id,
            Some(Utc.with_ymd_and_hms(2025, 3, day, 18, 0, 0).unwrap()),
            MatchStatus::Completed,
            "LCS",
            teams,
        )
    }

    #[test]
    fn test_win_with_tracked_team_second() {
        let m = completed(
            "m1",
            1,
            vec![
                TeamResult::new("Team Liquid").with_score(1),
                TeamResult::new("FlyQuest").with_score(2),
            ],
        );
        let c = classify_outcome(&m, &flyquest()).unwrap();
        assert!(c.win);
        assert_eq!((c.tracked_score, c.opponent_score), (2, 1));
    }

    #[test]
    fn test_game_wins_fallback() {
        let m = completed(
            "m1",
            1,
            vec![
                TeamResult::new("FlyQuest").with_game_wins(0),
                TeamResult::new("Cloud9").with_game_wins(3),
            ],
        );
        assert!(!classify_outcome(&m, &flyquest()).unwrap().win);
    }

    #[test]
    fn test_missing_opponent_score_defaults_to_zero() {
        let m = completed(
            "m1",
            1,
            vec![TeamResult::new("FlyQuest").with_score(1), TeamResult::new("Cloud9")],
        );
        let c = classify_outcome(&m, &flyquest()).unwrap();
        assert!(c.win);
        assert_eq!(c.opponent_score, 0);
    }

    #[test]
    fn test_equal_scores_are_a_loss() {
        let m = completed(
            "m1",
            1,
            vec![
                TeamResult::new("FlyQuest").with_score(1),
                TeamResult::new("Cloud9").with_score(1),
            ],
        );
        assert!(!classify_outcome(&m, &flyquest()).unwrap().win);
    }

    #[test]
    fn test_outcome_used_when_no_scores() {
        let m = completed(
            "m1",
            1,
            vec![
                TeamResult::new("FlyQuest").with_outcome(Outcome::Win),
                TeamResult::new("Cloud9").with_outcome(Outcome::Loss),
            ],
        );
        assert!(classify_outcome(&m, &flyquest()).unwrap().win);

        let m = completed(
            "m2",
            2,
            vec![
                TeamResult::new("FlyQuest"),
                TeamResult::new("Cloud9").with_outcome(Outcome::Win),
            ],
        );
        assert!(!classify_outcome(&m, &flyquest()).unwrap().win);
    }

    #[test]
    fn test_no_score_no_outcome_is_unclassifiable() {
        let m = completed(
            "m1",
            1,
            vec![TeamResult::new("FlyQuest"), TeamResult::new("Cloud9")],
        );
        assert!(classify_outcome(&m, &flyquest()).is_none());
    }

    #[test]
    fn test_unidentified_team_without_fallback() {
        let m = completed(
            "m1",
            1,
            vec![TeamResult::new("Team Liquid"), TeamResult::new("Cloud9")],
        );
        let team = flyquest().with_fallback(FallbackPolicy::Exclude);
        assert!(classify_outcome(&m, &team).is_none());
    }

    #[test]
    fn test_unidentified_team_with_fallback_uses_first() {
        let m = completed(
            "m1",
            1,
            vec![
                TeamResult::new("Team Liquid").with_score(2),
                TeamResult::new("Cloud9").with_score(0),
            ],
        );
        assert!(classify_outcome(&m, &flyquest()).unwrap().win);
    }

    #[test]
    fn test_wrong_team_count() {
        let m = completed("m1", 1, vec![TeamResult::new("FlyQuest").with_score(1)]);
        assert!(classify_outcome(&m, &flyquest()).is_none());
    }

    #[test]
    fn test_history_filters_and_sorts() {
        let mut upcoming = completed(
            "upcoming",
            9,
            vec![TeamResult::new("FlyQuest"), TeamResult::new("100 Thieves")],
        );
        upcoming.status = MatchStatus::Unstarted;

        let mut finished = completed(
            "late",
            5,
            vec![
                TeamResult::new("FlyQuest").with_score(0),
                TeamResult::new("Shopify Rebellion").with_code("SR").with_score(1),
            ],
        );
        finished.status = MatchStatus::Finished;

        let early = completed(
            "early",
            1,
            vec![
                TeamResult::new("Cloud9").with_score(0),
                TeamResult::new("FlyQuest").with_score(1),
            ],
        );

        let history = classify_history(&[upcoming, finished, early], &flyquest());
        let ids: Vec<_> = history.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        assert_eq!(history[0].opponent_label, "CLO");
        assert_eq!(history[1].opponent_label, "SR");
        assert!(history[0].win);
        assert!(!history[1].win);
    }
}
