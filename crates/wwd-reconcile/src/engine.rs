use std::collections::BTreeSet;
use std::fmt;

use chrono::DateTime;
use wwd_schemas::{RawWarning, ReconciledWarning, Severity, WarningTag};

use crate::severity::resolve_severity;

/// Feed-native issue timestamp layout. The offset is kept, not converted.
const FEED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M%z";
/// Display layout re-emitted in the bulletin's own offset.
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Errors that reject a whole reconcile call.
///
/// Both variants indicate upstream schema drift; the batch is rejected so
/// the operator sees the drift instead of silently losing bulletins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Neither severity field of the bulletin carried a rankable label.
    UnknownSeverity { id: String, label: String },
    /// The bulletin's issue timestamp did not match the feed layout.
    MalformedTimestamp { id: String, value: String },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::UnknownSeverity { id, label } => {
                write!(f, "unknown severity label '{label}' on bulletin {id}")
            }
            ReconcileError::MalformedTimestamp { id, value } => {
                write!(f, "malformed issue timestamp '{value}' on bulletin {id}")
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

/// Working entry for one hazard type while the batch is being collapsed.
struct Retained {
    id: String,
    hazard_type: String,
    status: String,
    severity: Severity,
    issued_at: String,
}

/// Collapse a raw bulletin batch to the current warning set and tag each
/// survivor's lifecycle against the previous poll's id set.
///
/// - At most one entry per hazard type: the highest-severity bulletin seen
///   for that type, ties keeping the first-seen one.
/// - Output order is the order hazard types were first encountered.
/// - `previous_ids` is matched on bulletin id, not hazard type.
/// - An empty batch is a valid "no active warnings" result, not an error.
pub fn reconcile(
    batch: &[RawWarning],
    previous_ids: &BTreeSet<String>,
) -> Result<Vec<ReconciledWarning>, ReconcileError> {
    let mut retained: Vec<Retained> = Vec::new();

    for raw in batch {
        // Every bulletin is validated, including ones a higher-severity
        // entry already shadows; a malformed shadowed bulletin still means
        // the feed changed shape.
        let severity = resolve_severity(raw)?;
        let issued_at = normalize_issued_at(raw)?;

        match retained
            .iter_mut()
            .find(|r| r.hazard_type == raw.hazard_type)
        {
            None => retained.push(Retained {
                id: raw.id.clone(),
                hazard_type: raw.hazard_type.clone(),
                status: raw.status.clone(),
                severity,
                issued_at,
            }),
            Some(entry) if severity > entry.severity => {
                entry.id = raw.id.clone();
                entry.status = raw.status.clone();
                entry.severity = severity;
                entry.issued_at = issued_at;
            }
            // Equal or lower rank keeps the first-seen bulletin.
            Some(_) => {}
        }
    }

    Ok(retained
        .into_iter()
        .map(|r| {
            let tag = if previous_ids.contains(&r.id) {
                WarningTag::Maintained
            } else {
                WarningTag::NewIssued
            };
            ReconciledWarning {
                tag,
                id: r.id,
                hazard_type: r.hazard_type,
                status: r.status,
                severity: r.severity,
                issued_at: r.issued_at,
            }
        })
        .collect())
}

/// Parse the feed-native issue time and re-emit it for display in the same
/// offset it was received in.
fn normalize_issued_at(raw: &RawWarning) -> Result<String, ReconcileError> {
    let parsed = DateTime::parse_from_str(&raw.issued_at, FEED_TIME_FORMAT).map_err(|_| {
        ReconcileError::MalformedTimestamp {
            id: raw.id.clone(),
            value: raw.issued_at.clone(),
        }
    })?;
    Ok(parsed.format(DISPLAY_TIME_FORMAT).to_string())
}
