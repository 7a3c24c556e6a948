//! wwd-config
//!
//! Explicit runtime configuration for the watch daemon. Values are read
//! once at startup and passed into the poll driver; there is no
//! process-wide mutable configuration state. The database URL is owned by
//! wwd-db (`WWD_DATABASE_URL`) and not duplicated here.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const ENV_API_KEY: &str = "WWD_FEED_API_KEY";
pub const ENV_LOCATION: &str = "WWD_FEED_LOCATION";
pub const ENV_FEED_BASE_URL: &str = "WWD_FEED_BASE_URL";
pub const ENV_POLL_INTERVAL_SECS: &str = "WWD_POLL_INTERVAL_SECS";
pub const ENV_SNAPSHOT_PATH: &str = "WWD_SNAPSHOT_PATH";

pub const DEFAULT_FEED_BASE_URL: &str = "https://devapi.qweather.com";
/// The upstream warning feed refreshes roughly every 15 minutes.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 900;
pub const DEFAULT_SNAPSHOT_PATH: &str = "record/weather_data.json";

/// Runtime configuration of the watch daemon.
///
/// `Debug` redacts the API key so the struct can be logged at startup.
#[derive(Clone)]
pub struct WatchConfig {
    pub api_key: String,
    /// Upstream location code the warnings are fetched for.
    pub location: String,
    pub feed_base_url: String,
    pub poll_interval: Duration,
    pub snapshot_path: PathBuf,
}

impl WatchConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .with_context(|| format!("missing env var {ENV_API_KEY}"))?;
        let location = std::env::var(ENV_LOCATION)
            .with_context(|| format!("missing env var {ENV_LOCATION}"))?;

        let feed_base_url = std::env::var(ENV_FEED_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_FEED_BASE_URL.to_string());

        let poll_interval = match std::env::var(ENV_POLL_INTERVAL_SECS) {
            Ok(raw) => parse_poll_interval(&raw)
                .with_context(|| format!("invalid {ENV_POLL_INTERVAL_SECS}"))?,
            Err(_) => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let snapshot_path = std::env::var(ENV_SNAPSHOT_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        Ok(Self {
            api_key,
            location,
            feed_base_url,
            poll_interval,
            snapshot_path,
        })
    }
}

/// Parse a poll interval in whole seconds. Zero is rejected: the sleep is
/// the only retry-storm protection the driver has.
pub fn parse_poll_interval(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("poll interval is not a number: '{raw}'"))?;
    if secs == 0 {
        bail!("poll interval must be > 0 seconds");
    }
    Ok(Duration::from_secs(secs))
}

impl fmt::Debug for WatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchConfig")
            .field("api_key", &"REDACTED")
            .field("location", &self.location)
            .field("feed_base_url", &self.feed_base_url)
            .field("poll_interval", &self.poll_interval)
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}
