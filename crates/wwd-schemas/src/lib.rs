use serde::{Deserialize, Serialize};
use std::fmt;

/// One hazard bulletin exactly as delivered by the upstream feed.
///
/// Immutable once fetched. `id` is feed-assigned and stable across reissues
/// of the same bulletin, which makes it the diff key between polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWarning {
    pub id: String,
    /// Category label used as the collapse key (e.g. "Rainstorm").
    pub hazard_type: String,
    pub status: String,
    /// Named severity color. May be empty; see `severity_level`.
    pub severity_color: String,
    /// Fallback severity used when `severity_color` is empty. The feed has
    /// carried either color words or level digits here across API revisions.
    pub severity_level: String,
    /// Feed-native issue timestamp: `YYYY-MM-DDTHH:MM` plus an offset.
    pub issued_at: String,
}

/// Severity scale of the upstream feed, lowest to highest.
///
/// The derived `Ord` is the priority order used by the collapse logic.
/// Any label outside this enumeration is unrankable and must be rejected by
/// the caller rather than defaulted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    White,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Black,
}

impl Severity {
    /// Numeric rank, White=1 .. Black=7.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::White => 1,
            Severity::Blue => 2,
            Severity::Green => 3,
            Severity::Yellow => 4,
            Severity::Orange => 5,
            Severity::Red => 6,
            Severity::Black => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::White => "White",
            Severity::Blue => "Blue",
            Severity::Green => "Green",
            Severity::Yellow => "Yellow",
            Severity::Orange => "Orange",
            Severity::Red => "Red",
            Severity::Black => "Black",
        }
    }

    /// Parse a severity label. Accepts the color name (any case) or the
    /// numeric level digit the feed's fallback field has used historically.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "1" => Some(Severity::White),
            "blue" | "2" => Some(Severity::Blue),
            "green" | "3" => Some(Severity::Green),
            "yellow" | "4" => Some(Severity::Yellow),
            "orange" | "5" => Some(Severity::Orange),
            "red" | "6" => Some(Severity::Red),
            "black" | "7" => Some(Severity::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a reconciled warning relative to the previous poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningTag {
    /// Bulletin id was not in the previous snapshot.
    NewIssued,
    /// Bulletin id was already present on the previous poll.
    Maintained,
}

impl WarningTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningTag::NewIssued => "NewIssued",
            WarningTag::Maintained => "Maintained",
        }
    }
}

/// One entry of the reconciled current warning set: at most one per hazard
/// type, the highest-severity bulletin observed for that type this poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledWarning {
    pub tag: WarningTag,
    pub id: String,
    pub hazard_type: String,
    pub status: String,
    pub severity: Severity,
    /// Normalized issue time: `YYYY-MM-DD HH:MM` in the offset it was
    /// received in (no timezone conversion).
    pub issued_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_matches_rank() {
        let all = [
            Severity::White,
            Severity::Blue,
            Severity::Green,
            Severity::Yellow,
            Severity::Orange,
            Severity::Red,
            Severity::Black,
        ];
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
        assert_eq!(Severity::White.rank(), 1);
        assert_eq!(Severity::Black.rank(), 7);
    }

    #[test]
    fn severity_parse_accepts_names_and_level_digits() {
        assert_eq!(Severity::parse("Yellow"), Some(Severity::Yellow));
        assert_eq!(Severity::parse("yellow"), Some(Severity::Yellow));
        assert_eq!(Severity::parse(" Red "), Some(Severity::Red));
        assert_eq!(Severity::parse("4"), Some(Severity::Yellow));
        assert_eq!(Severity::parse("7"), Some(Severity::Black));
    }

    #[test]
    fn severity_parse_rejects_unknown_labels() {
        assert_eq!(Severity::parse("Purple"), None);
        assert_eq!(Severity::parse(""), None);
        assert_eq!(Severity::parse("8"), None);
    }
}
