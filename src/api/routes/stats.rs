use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::StatsEngine;
use crate::feed::{parse_feed, FeedError};
use crate::models::{Achievement, DerivedStats, Lang, MatchRecord, TrackedTeam};

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    /// Slug, code or name of the team to track instead of the configured one
    pub team: Option<String>,
    pub lang: Option<String>,
}

impl StatsParams {
    fn engine(&self, state: &AppState) -> StatsEngine {
        let team = match self.team.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                TrackedTeam::from_identifier(id).with_fallback(state.team.fallback)
            }
            _ => state.team.as_ref().clone(),
        };
        StatsEngine::new(team)
    }

    fn lang(&self, state: &AppState) -> Lang {
        self.lang
            .as_deref()
            .map(Lang::parse)
            .unwrap_or(state.default_lang)
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// `null` when there is nothing to report
    pub stats: Option<DerivedStats>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<Achievement>,
    pub unlocked: usize,
    pub locked: usize,
}

async fn load_feed(state: &AppState) -> Result<Vec<MatchRecord>, ApiError> {
    let source = state
        .source
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("no match feed configured".to_string()))?;

    source.fetch_matches().await.map_err(|e| {
        warn!("Match source {} failed: {}", source.name(), e);
        match e {
            // Local cache or client setup, not the upstream feed
            FeedError::Io(_) | FeedError::InvalidHeader(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::Upstream(e.to_string()),
        }
    })
}

fn parse_body(body: &str) -> Result<Vec<MatchRecord>, ApiError> {
    parse_feed(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn stats_response(params: &StatsParams, state: &AppState, matches: &[MatchRecord]) -> StatsResponse {
    let stats = params.engine(state).stats(matches);
    debug!(
        "Computed stats over {} matches ({} classified)",
        matches.len(),
        stats.as_ref().map(|s| s.total_games).unwrap_or(0)
    );
    let message = match stats {
        Some(_) => None,
        None => Some(params.lang(state).no_stats_message().to_string()),
    };
    StatsResponse { stats, message }
}

fn achievements_response(
    params: &StatsParams,
    state: &AppState,
    matches: &[MatchRecord],
) -> AchievementsResponse {
    let achievements = params.engine(state).achievements(matches, params.lang(state));
    let unlocked = achievements.iter().filter(|a| a.unlocked).count();
    AchievementsResponse {
        locked: achievements.len() - unlocked,
        unlocked,
        achievements,
    }
}

pub async fn feed_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let matches = load_feed(&state).await?;
    Ok(Json(stats_response(&params, &state, &matches)))
}

pub async fn posted_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
    body: String,
) -> Result<Json<StatsResponse>, ApiError> {
    let matches = parse_body(&body)?;
    Ok(Json(stats_response(&params, &state, &matches)))
}

pub async fn feed_achievements(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let matches = load_feed(&state).await?;
    Ok(Json(achievements_response(&params, &state, &matches)))
}

pub async fn posted_achievements(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
    body: String,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let matches = parse_body(&body)?;
    Ok(Json(achievements_response(&params, &state, &matches)))
}
