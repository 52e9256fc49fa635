use serde::Deserialize;

use crate::models::MediaKind;
use crate::services::session::EmptyQueuePolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL; the in-memory store is used when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// OMDb API key; selects the search catalog when present
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Path to a bundled JSON title snapshot, used when no API key is set
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Kind of titles to discover
    #[serde(default = "default_media_kind")]
    pub media_kind: MediaKind,

    /// Rating threshold for the first discovery attempt
    #[serde(default = "default_min_rating")]
    pub min_rating: f32,

    /// Rating threshold for the single relaxed retry
    #[serde(default = "default_relaxed_rating")]
    pub relaxed_rating: f32,

    /// What to do once today's queue is drained
    #[serde(default)]
    pub empty_queue_policy: EmptyQueuePolicy,

    /// Versioned name of the offline asset cache
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_media_kind() -> MediaKind {
    MediaKind::Movie
}

fn default_min_rating() -> f32 {
    7.0
}

fn default_relaxed_rating() -> f32 {
    6.0
}

fn default_cache_name() -> String {
    "filmyfool-v11".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.omdb_api_key.is_none() && self.snapshot_path.is_none() {
            anyhow::bail!("Either OMDB_API_KEY or SNAPSHOT_PATH must be set");
        }
        if self.relaxed_rating > self.min_rating {
            anyhow::bail!(
                "RELAXED_RATING ({}) must not exceed MIN_RATING ({})",
                self.relaxed_rating,
                self.min_rating
            );
        }
        Ok(())
    }
}
