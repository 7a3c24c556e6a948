//! Severity resolution for raw bulletins.
//!
//! The upstream feed has moved the authoritative severity between the named
//! color field and the numeric level field across API revisions, so a
//! bulletin may populate either. Resolution prefers the color field and
//! falls back to the level field only when the color is empty.

use crate::engine::ReconcileError;
use wwd_schemas::{RawWarning, Severity};

/// Resolve the effective severity of one bulletin.
///
/// An unrecognized label fails the call instead of being defaulted: an
/// arbitrary rank would corrupt the priority collapse, and a silent drop
/// would hide feed-schema drift from the operator.
pub fn resolve_severity(raw: &RawWarning) -> Result<Severity, ReconcileError> {
    let label = if raw.severity_color.trim().is_empty() {
        raw.severity_level.as_str()
    } else {
        raw.severity_color.as_str()
    };

    Severity::parse(label).ok_or_else(|| ReconcileError::UnknownSeverity {
        id: raw.id.clone(),
        label: label.to_string(),
    })
}
