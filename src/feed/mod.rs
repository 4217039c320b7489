//! Match feeds.
//!
//! Turns upstream match JSON into canonical [`MatchRecord`]s and provides
//! the sources the CLI and API read from. All sources implement
//! [`MatchSource`].

pub mod client;
pub mod normalize;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::MatchRecord;

pub use client::{CacheMetadata, FeedClient, FeedClientConfig, FeedSnapshot};
pub use normalize::{normalize_document, normalize_match, parse_feed};

/// Errors that can occur while loading a match feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported feed shape: {0}")]
    UnsupportedShape(String),
}

/// Anything that can produce a snapshot of matches.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Load the current match snapshot.
    async fn fetch_matches(&self) -> Result<Vec<MatchRecord>, FeedError>;
}

/// A fixed, in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    matches: Vec<MatchRecord>,
}

impl StaticSource {
    pub fn new(matches: Vec<MatchRecord>) -> Self {
        Self { matches }
    }

    /// Load a feed document (array or `{ "matches": [...] }`) from disk.
    pub fn from_file(path: &Path) -> Result<Self, FeedError> {
        let body = std::fs::read_to_string(path)?;
        Ok(Self::new(parse_feed(&body)?))
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }
}

#[async_trait]
impl MatchSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_matches(&self) -> Result<Vec<MatchRecord>, FeedError> {
        Ok(self.matches.clone())
    }
}
