//! Poll driver: fetch, reconcile, persist, sleep, repeat.
//!
//! One cycle runs to completion before the next tick; cycles never overlap.
//! Any step failure skips the remaining persist steps for that cycle so the
//! previous snapshot stays the diff baseline, then the driver sleeps the
//! fixed interval and retries. No failure terminates the process.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{error, info, warn};
use wwd_feed::WarningFeed;
use wwd_schemas::{ReconciledWarning, WarningTag};
use wwd_snapshot::SnapshotStore;

use crate::state::{uptime_secs, AppState};

// ---------------------------------------------------------------------------
// Dependencies & outcome
// ---------------------------------------------------------------------------

/// Collaborators of one poll cycle, owned by the driver task.
pub struct PollDeps {
    pub feed: Box<dyn WarningFeed>,
    pub snapshot: SnapshotStore,
}

/// Summary of a successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub active: usize,
    pub new_issued: usize,
    pub maintained: usize,
}

// ---------------------------------------------------------------------------
// One cycle
// ---------------------------------------------------------------------------

/// Run one poll cycle: Fetch → Load-Snapshot → Reconcile → Persist-Result →
/// Save-Snapshot.
///
/// The snapshot save happens last: a failed sink refresh must leave the
/// previous id set intact so the next cycle re-diffs against the same
/// baseline. A zero-warning fetch is a success and persists the sentinel
/// state so readers see "checked, nothing active".
pub async fn run_cycle(deps: &PollDeps, pool: &PgPool) -> Result<CycleOutcome> {
    let batch = deps.feed.fetch_active().await.map_err(|e| {
        anyhow::anyhow!("warning fetch from {} failed: {e}", deps.feed.source_name())
    })?;

    let previous_ids = deps
        .snapshot
        .load()
        .context("previous snapshot load failed")?;

    let reconciled =
        wwd_reconcile::reconcile(&batch, &previous_ids).context("reconcile failed")?;

    wwd_db::refresh_current(pool, &reconciled)
        .await
        .context("current warning refresh failed")?;

    deps.snapshot
        .save(&batch)
        .context("snapshot save failed")?;

    report_warnings(&reconciled);

    let new_issued = reconciled
        .iter()
        .filter(|w| w.tag == WarningTag::NewIssued)
        .count();
    Ok(CycleOutcome {
        active: reconciled.len(),
        new_issued,
        maintained: reconciled.len() - new_issued,
    })
}

fn report_warnings(reconciled: &[ReconciledWarning]) {
    if reconciled.is_empty() {
        info!("no warnings active now");
        return;
    }
    for w in reconciled {
        match w.tag {
            WarningTag::NewIssued => warn!(
                hazard = %w.hazard_type,
                severity = %w.severity,
                "[NEW WARNING] {} since {}",
                w.status,
                w.issued_at
            ),
            WarningTag::Maintained => info!(
                hazard = %w.hazard_type,
                severity = %w.severity,
                "[PERSISTING] since {}",
                w.issued_at
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Driver task
// ---------------------------------------------------------------------------

/// Spawn the poll driver task.
///
/// Driven by `tokio::time::interval` (first cycle fires immediately). The
/// shutdown flag is checked between cycles, never mid-cycle, preserving
/// at-most-one-cycle-in-flight; process shutdown while a cycle runs is
/// safe because the only durable mutations (sink refresh, snapshot rename)
/// are each atomic.
pub fn spawn_poll_loop(
    state: Arc<AppState>,
    deps: PollDeps,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if *shutdown.borrow() {
                info!("poll driver stopping");
                break;
            }

            let result = run_cycle(&deps, &state.pool).await;

            let mut snap = state.poll.write().await;
            snap.daemon_uptime_secs = uptime_secs();
            snap.last_poll_utc = Some(Utc::now());
            match result {
                Ok(outcome) => {
                    snap.cycles_completed += 1;
                    snap.last_outcome = "ok".to_string();
                    snap.last_error = None;
                    snap.active_warnings = Some(outcome.active as u64);
                    info!(
                        active = outcome.active,
                        new_issued = outcome.new_issued,
                        maintained = outcome.maintained,
                        "poll cycle ok"
                    );
                }
                Err(e) => {
                    snap.cycles_failed += 1;
                    snap.last_outcome = "failed".to_string();
                    snap.last_error = Some(format!("{e:#}"));
                    error!("poll cycle failed: {e:#}");
                }
            }
        }
    });
}
