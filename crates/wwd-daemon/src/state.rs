//! Shared runtime state for wwd-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The poll driver task
//! holds the same Arc and updates `poll` after each cycle; beyond the
//! Postgres pool there is no other state shared between the read path and
//! the poll cycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health / status responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// PollSnapshot
// ---------------------------------------------------------------------------

/// Point-in-time view of the poll driver, returned by GET /v1/status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollSnapshot {
    pub daemon_uptime_secs: u64,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub last_poll_utc: Option<DateTime<Utc>>,
    /// "idle" until the first cycle finishes, then "ok" | "failed".
    pub last_outcome: String,
    pub last_error: Option<String>,
    /// Reconciled warning count of the last successful cycle.
    pub active_warnings: Option<u64>,
}

impl PollSnapshot {
    pub fn idle() -> Self {
        Self {
            daemon_uptime_secs: uptime_secs(),
            cycles_completed: 0,
            cycles_failed: 0,
            last_poll_utc: None,
            last_outcome: "idle".to_string(),
            last_error: None,
            active_warnings: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared across all Axum handlers and the poll task.
#[derive(Clone)]
pub struct AppState {
    /// Durable sink; shared with the read path.
    pub pool: PgPool,
    /// Static build metadata.
    pub build: BuildInfo,
    /// Latest poll driver snapshot.
    pub poll: Arc<RwLock<PollSnapshot>>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            build: BuildInfo {
                service: "wwd-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            poll: Arc::new(RwLock::new(PollSnapshot::idle())),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Monotonically increasing uptime since first call (process lifetime).
pub fn uptime_secs() -> u64 {
    static START: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    START
        .get_or_init(std::time::Instant::now)
        .elapsed()
        .as_secs()
}
