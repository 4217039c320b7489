use std::sync::Arc;

use crate::feed::MatchSource;
use crate::models::{Lang, TrackedTeam};

#[derive(Clone)]
pub struct AppState {
    /// Team used when a request does not name one
    pub team: Arc<TrackedTeam>,
    pub default_lang: Lang,
    /// Configured match feed; `None` means only posted matches are accepted
    pub source: Option<Arc<dyn MatchSource>>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(team: TrackedTeam, default_lang: Lang) -> Self {
        Self {
            team: Arc::new(team),
            default_lang,
            source: None,
            cors_origin: "*".to_string(),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn MatchSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }
}
