//! wwd-reconcile
//!
//! Warning reconciliation engine.
//!
//! Architectural decisions:
//! - One entry per hazard type, highest severity wins
//! - Strictly-greater rank replaces; ties keep the first-seen bulletin
//! - Lifecycle tag derived from bulletin id membership in the previous poll
//! - A single malformed bulletin rejects the whole batch
//!
//! Deterministic, pure logic. No IO. No feed calls.

mod engine;
mod severity;

pub use engine::{reconcile, ReconcileError};
pub use severity::resolve_severity;
