//! HTTP match feed client with a local cache.
//!
//! The raw feed body is cached on disk next to a small JSON metadata file.
//! A fresh cache entry is served without touching the network. When the
//! upstream is unreachable or answers with an error, a stale entry is
//! served instead of failing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::MatchRecord;

use super::{parse_feed, FeedError, MatchSource};

/// A feed body and where it came from.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub body: String,
    pub fetched_at: DateTime<Utc>,
    pub from_cache: bool,

    /// Served from cache past its TTL because upstream failed
    pub stale: bool,
}

/// Metadata stored alongside cached content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub content_type: Option<String>,
    pub content_length: usize,
    pub etag: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    pub url: Url,

    /// Directory to cache raw feed bodies
    pub cache_dir: PathBuf,

    /// How long a cached body is considered fresh
    pub cache_ttl: Duration,

    /// Maximum body size to accept
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    pub user_agent: String,

    /// Sent as `x-api-key` when set
    pub api_key: Option<String>,
}

impl FeedClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            cache_dir: PathBuf::from("./data/raw"),
            cache_ttl: Duration::from_secs(300),
            max_content_size: 5 * 1024 * 1024,
            timeout: Duration::from_secs(30),
            user_agent: format!("esports-stats/{}", env!("CARGO_PKG_VERSION")),
            api_key: None,
        }
    }
}

/// Match feed client with local caching.
pub struct FeedClient {
    client: Client,
    config: FeedClientConfig,
}

impl FeedClient {
    pub fn new(config: FeedClientConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("esports-stats")),
        );
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| FeedError::InvalidHeader("x-api-key".into()))?;
            headers.insert("x-api-key", value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn url(&self) -> &Url {
        &self.config.url
    }

    /// Fetch the feed, using a fresh cache entry if there is one and
    /// falling back to a stale one if upstream fails.
    pub async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        if let Some(snapshot) = self.read_cache(false).await? {
            return Ok(snapshot);
        }

        match self.fetch_and_cache().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => match self.read_cache(true).await {
                Ok(Some(snapshot)) => {
                    warn!(
                        "Upstream feed {} failed ({}), serving cache from {}",
                        self.config.url, e, snapshot.fetched_at
                    );
                    Ok(snapshot)
                }
                Ok(None) => Err(e),
                Err(cache_err) => {
                    debug!("Stale cache unreadable for {}: {}", self.config.url, cache_err);
                    Err(e)
                }
            },
        }
    }

    /// Read the cache entry. Expired entries are only returned when
    /// `allow_stale` is set.
    async fn read_cache(&self, allow_stale: bool) -> Result<Option<FeedSnapshot>, FeedError> {
        let cache_path = self.cache_path();
        let meta_path = self.meta_path();
        if !cache_path.exists() || !meta_path.exists() {
            return Ok(None);
        }

        let meta_content = fs::read_to_string(&meta_path).await?;
        let meta: CacheMetadata = match serde_json::from_str(&meta_content) {
            Ok(m) => m,
            Err(_) => return Ok(None),
        };

        let age = Utc::now().signed_duration_since(meta.fetched_at);
        let expired = age.num_seconds() > self.config.cache_ttl.as_secs() as i64;
        if expired && !allow_stale {
            debug!("Cache expired for {}", self.config.url);
            return Ok(None);
        }

        let body = fs::read_to_string(&cache_path).await?;
        if !expired {
            info!("Serving {} from cache", self.config.url);
        }
        Ok(Some(FeedSnapshot {
            body,
            fetched_at: meta.fetched_at,
            from_cache: true,
            stale: expired,
        }))
    }

    /// Fetch from network and cache the result.
    async fn fetch_and_cache(&self) -> Result<FeedSnapshot, FeedError> {
        let url = &self.config.url;
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FeedError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let etag = response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(len) = response.content_length() {
            let size = usize::try_from(len).unwrap_or(usize::MAX);
            if size > self.config.max_content_size {
                return Err(FeedError::ContentTooLarge {
                    size,
                    max_size: self.config.max_content_size,
                });
            }
        }

        let content = response.bytes().await?;

        if content.len() > self.config.max_content_size {
            return Err(FeedError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }

        let fetched_at = Utc::now();
        let meta = CacheMetadata {
            url: url.to_string(),
            fetched_at,
            content_type,
            content_length: content.len(),
            etag,
            expires_at: Some(
                fetched_at + chrono::Duration::seconds(self.config.cache_ttl.as_secs() as i64),
            ),
        };
        self.write_cache(&content, &meta).await?;

        Ok(FeedSnapshot {
            body: String::from_utf8_lossy(&content).into_owned(),
            fetched_at,
            from_cache: false,
            stale: false,
        })
    }

    /// Write a body and its metadata to the cache.
    pub(crate) async fn write_cache(
        &self,
        content: &[u8],
        meta: &CacheMetadata,
    ) -> Result<(), FeedError> {
        let cache_path = self.cache_path();
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&cache_path).await?;
        file.write_all(content).await?;
        file.flush().await?;

        let meta_json = serde_json::to_string_pretty(meta)?;
        fs::write(self.meta_path(), meta_json).await?;
        Ok(())
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_dir_for_host()
            .join(format!("{}.json", Self::url_hash(&self.config.url)))
    }

    fn meta_path(&self) -> PathBuf {
        self.cache_dir_for_host()
            .join(format!("{}.meta.json", Self::url_hash(&self.config.url)))
    }

    fn cache_dir_for_host(&self) -> PathBuf {
        let host = self.config.url.host_str().unwrap_or("unknown");
        self.config.cache_dir.join(host)
    }

    /// Hash a URL to a short string.
    fn url_hash(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }

    /// Cache directory root.
    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }
}

#[async_trait]
impl MatchSource for FeedClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_matches(&self) -> Result<Vec<MatchRecord>, FeedError> {
        let snapshot = self.fetch().await?;
        parse_feed(&snapshot.body)
    }
}
