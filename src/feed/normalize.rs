//! Normalization of upstream match JSON.
//!
//! Upstream feeds are loosely typed: the document may be a bare array or an
//! object wrapping a `matches` array, `league` may be a string or an object
//! with a `name`, and scores are not always numbers. Everything is resolved
//! here so the stats engine only sees canonical records.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{MatchId, MatchRecord, MatchStatus, Outcome, SeriesFormat, TeamResult};

use super::FeedError;

const UNKNOWN_LEAGUE: &str = "Unknown";

/// Accepted top-level document shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    List(Vec<Value>),
    Wrapped { matches: Vec<Value> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLeague {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
    Other(serde::de::IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    #[serde(default)]
    id: Option<Value>,

    #[serde(default)]
    start_time: Option<String>,

    #[serde(default, alias = "state")]
    status: Option<String>,

    #[serde(default)]
    league: Option<RawLeague>,

    #[serde(default)]
    format: Option<String>,

    #[serde(default)]
    teams: Vec<RawTeam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTeam {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    slug: Option<String>,

    #[serde(default)]
    code: Option<String>,

    #[serde(default)]
    score: Option<Value>,

    #[serde(default)]
    result: Option<RawTeamResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTeamResult {
    #[serde(default)]
    outcome: Option<String>,

    #[serde(default)]
    game_wins: Option<Value>,
}

/// Parse a feed body into canonical records.
pub fn parse_feed(body: &str) -> Result<Vec<MatchRecord>, FeedError> {
    let doc: Value = serde_json::from_str(body)?;
    normalize_document(doc)
}

/// Normalize an already parsed feed document.
///
/// Individual entries that cannot be read are skipped with a warning.
pub fn normalize_document(doc: Value) -> Result<Vec<MatchRecord>, FeedError> {
    let entries = match serde_json::from_value::<FeedDocument>(doc) {
        Ok(FeedDocument::List(entries)) => entries,
        Ok(FeedDocument::Wrapped { matches }) => matches,
        Err(_) => {
            return Err(FeedError::UnsupportedShape(
                "expected an array of matches or an object with a `matches` array".to_string(),
            ))
        }
    };

    let total = entries.len();
    let records: Vec<MatchRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match normalize_match(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping feed entry {}: {}", i, e);
                None
            }
        })
        .collect();

    debug!("Normalized {} of {} feed entries", records.len(), total);
    Ok(records)
}

/// Normalize a single match entry.
pub fn normalize_match(entry: Value) -> Result<MatchRecord, serde_json::Error> {
    let raw: RawMatch = serde_json::from_value(entry)?;

    let teams: Vec<TeamResult> = raw.teams.into_iter().map(normalize_team).collect();
    let start_time = raw.start_time.as_deref().and_then(parse_start_time);

    let id = match raw.id.as_ref().and_then(id_string) {
        Some(id) => MatchId::new(id),
        None => {
            let mut fields = vec![raw.start_time.as_deref().unwrap_or("")];
            fields.extend(teams.iter().map(|t| t.name.as_str()));
            MatchId::generate(&fields)
        }
    };

    Ok(MatchRecord {
        id,
        start_time,
        status: raw
            .status
            .as_deref()
            .map(MatchStatus::parse)
            .unwrap_or(MatchStatus::Unknown),
        league: league_name(raw.league),
        format: raw
            .format
            .as_deref()
            .and_then(SeriesFormat::parse)
            .unwrap_or_default(),
        teams,
    })
}

fn normalize_team(raw: RawTeam) -> TeamResult {
    let (outcome, game_wins) = match raw.result {
        Some(r) => (
            r.outcome.as_deref().and_then(Outcome::parse),
            r.game_wins.as_ref().and_then(numeric),
        ),
        None => (None, None),
    };

    TeamResult {
        name: raw.name.unwrap_or_default(),
        slug: raw.slug,
        code: raw.code,
        score: raw.score.as_ref().and_then(numeric),
        outcome,
        game_wins,
    }
}

/// A non-negative whole JSON number such as `2` or `2.0`. Strings,
/// fractions and other types are not counts.
fn numeric(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    v.as_f64()
        .filter(|n| n.is_finite() && n.fract() == 0.0)
        .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_start_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn league_name(league: Option<RawLeague>) -> String {
    let name = match league {
        Some(RawLeague::Name(name)) => Some(name),
        Some(RawLeague::Object { name }) => name,
        Some(RawLeague::Other(_)) | None => None,
    };
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_LEAGUE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let records = parse_feed(
            r#"[{"id": "a", "status": "completed", "teams": []},
                {"id": "b", "status": "unstarted", "teams": []}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].status, MatchStatus::Unstarted);
    }

    #[test]
    fn test_wrapped_object() {
        let records = parse_feed(r#"{"matches": [{"id": "a"}], "source": "cache"}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, MatchStatus::Unknown);
    }

    #[test]
    fn test_unsupported_shape() {
        assert!(matches!(
            parse_feed(r#"{"data": {}}"#).unwrap_err(),
            FeedError::UnsupportedShape(_)
        ));
        assert!(matches!(parse_feed("42").unwrap_err(), FeedError::UnsupportedShape(_)));
    }

    #[test]
    fn test_bad_entry_skipped() {
        let records = parse_feed(r#"[{"id": "ok"}, {"id": "bad", "teams": "nope"}, 7]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "ok");
    }

    #[test]
    fn test_full_entry() {
        let record = normalize_match(json!({
            "id": 110853167109316785u64,
            "startTime": "2025-03-01T18:00:00.000Z",
            "state": "completed",
            "league": {"name": "LTA North", "slug": "lta_n"},
            "format": "bo5",
            "teams": [
                {"name": "FlyQuest", "code": "FLY", "result": {"outcome": "win", "gameWins": 3}},
                {"name": "Cloud9", "code": "C9", "score": 2}
            ]
        }))
        .unwrap();

        assert_eq!(record.id.as_str(), "110853167109316785");
        assert_eq!(
            record.start_time,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap())
        );
        assert_eq!(record.status, MatchStatus::Completed);
        assert_eq!(record.league, "LTA North");
        assert_eq!(record.format.games(), 5);
        assert_eq!(
            record.teams[0],
            TeamResult::new("FlyQuest")
                .with_code("FLY")
                .with_outcome(Outcome::Win)
                .with_game_wins(3)
        );
        assert_eq!(record.teams[1].score, Some(2));
    }

    #[test]
    fn test_league_variants() {
        let league = |v: Value| normalize_match(json!({"id": "x", "league": v})).unwrap().league;
        assert_eq!(league(json!("LCS")), "LCS");
        assert_eq!(league(json!({"name": "MSI"})), "MSI");
        assert_eq!(league(json!({"slug": "msi"})), "Unknown");
        assert_eq!(league(json!("")), "Unknown");
        assert_eq!(league(json!(5)), "Unknown");
        assert_eq!(normalize_match(json!({"id": "x"})).unwrap().league, "Unknown");
    }

    #[test]
    fn test_non_numeric_scores_become_absent() {
        let record = normalize_match(json!({
            "id": "x",
            "teams": [
                {"name": "FlyQuest", "score": "2", "result": {"gameWins": null}},
                {"name": "Cloud9", "score": -1, "result": {"gameWins": 1}}
            ]
        }))
        .unwrap();
        assert_eq!(record.teams[0].score, None);
        assert_eq!(record.teams[0].game_wins, None);
        assert_eq!(record.teams[1].score, None);
        assert_eq!(record.teams[1].game_wins, Some(1));
    }

    #[test]
    fn test_fractional_scores_become_absent() {
        let record = normalize_match(json!({
            "id": "x",
            "teams": [
                {"name": "FlyQuest", "score": 2.9, "result": {"gameWins": 3.0}},
                {"name": "Cloud9", "score": 2.0, "result": {"gameWins": 0.5}}
            ]
        }))
        .unwrap();
        assert_eq!(record.teams[0].score, None);
        assert_eq!(record.teams[0].game_wins, Some(3));
        assert_eq!(record.teams[1].score, Some(2));
        assert_eq!(record.teams[1].game_wins, None);
    }

    #[test]
    fn test_missing_id_is_deterministic() {
        let entry = json!({
            "startTime": "2025-03-01T18:00:00Z",
            "teams": [{"name": "FlyQuest"}, {"name": "Cloud9"}]
        });
        let a = normalize_match(entry.clone()).unwrap();
        let b = normalize_match(entry).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_str().len(), 16);
    }

    #[test]
    fn test_defaults() {
        let record = normalize_match(json!({"id": "x", "startTime": "not a date"})).unwrap();
        assert_eq!(record.start_time, None);
        assert_eq!(record.format, SeriesFormat::default());
        assert!(record.teams.is_empty());
    }
}
