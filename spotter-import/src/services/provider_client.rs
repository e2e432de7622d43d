//! Sports-data provider API client
//!
//! Thin reqwest wrapper over the remote service the roster fetcher
//! pulls from: team rosters by (league, season) and squad pages by
//! (team, season, page). Requests are rate limited and carry a bounded
//! timeout; any malformed payload surfaces as a per-unit error, never
//! a panic.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
const API_KEY_HEADER: &str = "x-apisports-key";
const USER_AGENT: &str = "spotter/0.1.0";
const RATE_LIMIT_MS: u64 = 250;
const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Provider client errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One team entry from the roster listing
#[derive(Debug, Clone, Deserialize)]
pub struct TeamEntry {
    pub team: TeamInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamInfo {
    /// Provider-internal id; entries without one cannot be queried for
    /// their squad
    pub id: Option<u32>,
    pub name: Option<String>,
}

/// One player entry from a squad page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerEntry {
    #[serde(default)]
    pub player: PlayerInfo,
    #[serde(default)]
    pub stats: Option<StatBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerInfo {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub age: Option<u8>,
    /// Unit-ambiguous string ("187 cm", "187"); parsed downstream
    pub height: Option<String>,
    pub position: Option<String>,
    #[serde(rename = "preferredFoot")]
    pub preferred_foot: Option<String>,
}

/// Statistics block; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatBlock {
    #[serde(rename = "onLoan", default)]
    pub on_loan: bool,
    #[serde(rename = "loanFrom")]
    pub loan_from: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub ratings: Option<RatingBlock>,
}

/// Per-attribute ratings. Absent fields stay absent: zero is a valid
/// low score, not a stand-in for "unknown".
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RatingBlock {
    pub technik: Option<u8>,
    pub schnelligkeit: Option<u8>,
    pub zweikampf: Option<u8>,
    pub passspiel: Option<u8>,
    pub kopfball: Option<u8>,
    pub abschluss: Option<u8>,
}

/// Envelope every provider listing comes in. The paging metadata the
/// provider reports is inconsistent and is deliberately not modeled;
/// pagination stops on an empty page or the hard cap.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

/// Trait the roster fetcher pulls from, so tests can script a provider
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// All teams registered for (league, season)
    async fn teams(&self, league_id: u32, season: u16) -> Result<Vec<TeamEntry>, ProviderError>;

    /// One page of a team squad; pages start at 1
    async fn players(
        &self,
        team_id: u32,
        season: u16,
        page: u32,
    ) -> Result<Vec<PlayerEntry>, ProviderError>;
}

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Sports-data provider API client
pub struct ProviderClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl ProviderClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, url: String) -> Result<Vec<T>, ProviderError> {
        self.rate_limiter.wait().await;

        tracing::debug!(url = %url, "Querying sports-data provider");

        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), error_text));
        }

        let body: ListResponse<T> = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(body.response)
    }
}

#[async_trait]
impl RosterProvider for ProviderClient {
    async fn teams(&self, league_id: u32, season: u16) -> Result<Vec<TeamEntry>, ProviderError> {
        let url = format!(
            "{}/teams?league={}&season={}",
            self.base_url, league_id, season
        );
        self.get_list(url).await
    }

    async fn players(
        &self,
        team_id: u32,
        season: u16,
        page: u32,
    ) -> Result<Vec<PlayerEntry>, ProviderError> {
        let url = format!(
            "{}/players?team={}&season={}&page={}",
            self.base_url, team_id, season, page
        );
        self.get_list(url).await
    }
}
