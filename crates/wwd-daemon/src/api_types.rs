//! Request and response types for the wwd-daemon HTTP endpoints.
//!
//! These types are `Serialize + Deserialize` so they can be JSON-encoded
//! by Axum and decoded by tests. No business logic lives here.
//! GET /v1/status returns [`crate::state::PollSnapshot`] directly and
//! GET /v1/warnings/current returns `Vec<wwd_db::WarningRow>`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Internal error (500)
// ---------------------------------------------------------------------------

/// Response body when a read query against the sink fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
