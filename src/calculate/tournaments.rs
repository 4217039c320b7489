//! Per-league aggregation.

use crate::models::{MatchRecord, TournamentStat, TrackedTeam};

use super::outcome::{classify_history, ClassifiedMatch};
use super::{calculate_win_rate, round_one_decimal};

/// Group wins and losses by league, most played first.
pub fn aggregate_by_tournament(matches: &[MatchRecord], team: &TrackedTeam) -> Vec<TournamentStat> {
    tournament_breakdown(&classify_history(matches, team))
}

/// Group an already classified history by league.
///
/// Ties in `total` keep first-seen order.
pub fn tournament_breakdown(history: &[ClassifiedMatch]) -> Vec<TournamentStat> {
    let mut stats = league_records(history)
        .into_iter()
        .map(|(name, wins, losses)| {
            let total = wins + losses;
            TournamentStat {
                name,
                wins,
                losses,
                total,
                winrate: round_one_decimal(calculate_win_rate(wins, total)),
            }
        })
        .collect::<Vec<_>>();

    stats.sort_by(|a, b| b.total.cmp(&a.total));
    stats
}

/// `(league, wins, losses)` in first-seen order.
pub(crate) fn league_records(history: &[ClassifiedMatch]) -> Vec<(String, u32, u32)> {
    let mut records: Vec<(String, u32, u32)> = Vec::new();

    for m in history {
        let idx = match records.iter().position(|(name, _, _)| *name == m.league) {
            Some(idx) => idx,
            None => {
                records.push((m.league.clone(), 0, 0));
                records.len() - 1
            }
        };
        if m.win {
            records[idx].1 += 1;
        } else {
            records[idx].2 += 1;
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FallbackPolicy, MatchStatus, TeamResult};
    use chrono::{Duration, TimeZone, Utc};

    fn history(results: &[(&str, bool)]) -> Vec<MatchRecord> {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        results
            .iter()
            .enumerate()
            .map(|(i, (league, won))| {
                let (fly, opp) = if *won { (2, 0) } else { (0, 2) };
                MatchRecord::new(
                    format!("m{}", i),
                    Some(base + Duration::days(i as i64)),
                    MatchStatus::Completed,
                    *league,
                    vec![
                        TeamResult::new("FlyQuest").with_score(fly),
                        TeamResult::new("Opponent").with_score(opp),
                    ],
                )
            })
            .collect()
    }

    fn team() -> TrackedTeam {
        TrackedTeam::from_identifier("flyquest").with_fallback(FallbackPolicy::Exclude)
    }

    #[test]
    fn test_grouping_and_sorting() {
        let matches = history(&[
            ("MSI", true),
            ("LCS", true),
            ("LCS", false),
            ("LCS", true),
            ("Worlds", false),
        ]);
        let stats = aggregate_by_tournament(&matches, &team());

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].name, "LCS");
        assert_eq!(stats[0].wins, 2);
        assert_eq!(stats[0].losses, 1);
        assert_eq!(stats[0].total, 3);
        assert_eq!(stats[0].winrate, 66.7);
        // MSI and Worlds tie on total; first-seen order kept
        assert_eq!(stats[1].name, "MSI");
        assert_eq!(stats[2].name, "Worlds");
        assert_eq!(stats[2].winrate, 0.0);
    }

    #[test]
    fn test_totals_add_up() {
        let matches = history(&[("LCS", true), ("LCS", false), ("MSI", true)]);
        let stats = aggregate_by_tournament(&matches, &team());
        for s in &stats {
            assert_eq!(s.wins + s.losses, s.total);
        }
        assert_eq!(stats.iter().map(|s| s.total).sum::<u32>(), 3);
    }

    #[test]
    fn test_empty() {
        assert!(aggregate_by_tournament(&[], &team()).is_empty());
    }
}
