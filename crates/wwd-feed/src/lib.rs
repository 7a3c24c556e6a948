//! wwd-feed
//!
//! Upstream warning-feed boundary. This crate owns the wire model of the
//! qWeather-style `warning/now` payload and the concrete HTTP client.
//! It does not reconcile and does not persist; callers hand the raw batch
//! to wwd-reconcile / wwd-db.

use std::fmt;

use serde::Deserialize;
use wwd_schemas::RawWarning;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a warning fetch may return. All of them are per-cycle conditions:
/// the poll driver logs and retries on the next tick.
#[derive(Debug)]
pub enum FeedError {
    /// Network or transport failure.
    Transport(String),
    /// The upstream API answered with a non-2xx status.
    Http { status: u16 },
    /// A response payload could not be decoded.
    Decode(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Transport(msg) => write!(f, "transport error: {msg}"),
            FeedError::Http { status } => write!(f, "feed http error status={status}"),
            FeedError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

/// Top-level `warning/now` response. Only the `warning` array is consumed;
/// everything else the feed sends is ignored.
#[derive(Debug, Deserialize)]
struct WarningNowResponse {
    #[serde(default)]
    warning: Vec<WarningItem>,
}

#[derive(Debug, Deserialize)]
struct WarningItem {
    id: String,
    #[serde(rename = "typeName")]
    type_name: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "severityColor", default)]
    severity_color: String,
    #[serde(default)]
    level: String,
    #[serde(rename = "startTime")]
    start_time: String,
}

impl WarningItem {
    fn into_raw(self) -> RawWarning {
        RawWarning {
            id: self.id,
            hazard_type: self.type_name,
            status: self.status,
            severity_color: self.severity_color,
            severity_level: self.level,
            issued_at: self.start_time,
        }
    }
}

// ---------------------------------------------------------------------------
// Feed trait
// ---------------------------------------------------------------------------

/// Pluggable warning-feed interface.
///
/// Object-safe so the poll driver can hold a `Box<dyn WarningFeed>`;
/// `Send + Sync` so it can cross async task boundaries.
#[async_trait::async_trait]
pub trait WarningFeed: Send + Sync {
    /// Human-readable name identifying this feed (e.g. `"qweather"`).
    fn source_name(&self) -> &'static str;

    /// Fetch the currently active warning bulletins for the configured
    /// location. An empty `Vec` means "checked, nothing active".
    async fn fetch_active(&self) -> Result<Vec<RawWarning>, FeedError>;
}

// ---------------------------------------------------------------------------
// qWeather implementation
// ---------------------------------------------------------------------------

/// qWeather-backed warning feed.
///
/// API key is read by the caller (config) and passed in; do not log it.
#[derive(Clone)]
pub struct QWeatherFeed {
    api_key: String,
    location: String,
    http: reqwest::Client,
    base_url: String,
}

impl QWeatherFeed {
    pub fn new(api_key: String, location: String) -> Self {
        Self::new_with_base_url(api_key, location, "https://devapi.qweather.com".to_string())
    }

    pub fn new_with_base_url(api_key: String, location: String, base_url: String) -> Self {
        Self {
            api_key,
            location,
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn build_warning_now_url(&self) -> String {
        format!("{}/v7/warning/now", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for QWeatherFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QWeatherFeed")
            .field("api_key", &"REDACTED")
            .field("location", &self.location)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait::async_trait]
impl WarningFeed for QWeatherFeed {
    fn source_name(&self) -> &'static str {
        "qweather"
    }

    async fn fetch_active(&self) -> Result<Vec<RawWarning>, FeedError> {
        let resp = self
            .http
            .get(self.build_warning_now_url())
            .query(&[
                ("location", self.location.as_str()),
                ("lang", "en"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Http {
                status: status.as_u16(),
            });
        }

        let body: WarningNowResponse = resp
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))?;

        Ok(body.warning.into_iter().map(WarningItem::into_raw).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
