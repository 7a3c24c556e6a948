use std::collections::BTreeSet;

use wwd_reconcile::reconcile;
use wwd_schemas::{RawWarning, Severity};

fn bulletin(id: &str, hazard: &str, color: &str) -> RawWarning {
    RawWarning {
        id: id.to_string(),
        hazard_type: hazard.to_string(),
        status: "active".to_string(),
        severity_color: color.to_string(),
        severity_level: String::new(),
        issued_at: "2024-06-01T08:00+08:00".to_string(),
    }
}

#[test]
fn scenario_one_entry_per_hazard_type() {
    let batch = vec![
        bulletin("a1", "Rainstorm", "Yellow"),
        bulletin("a2", "Rainstorm", "Orange"),
        bulletin("b1", "Typhoon", "Blue"),
        bulletin("a3", "Rainstorm", "Red"),
        bulletin("b2", "Typhoon", "Blue"),
    ];

    let out = reconcile(&batch, &BTreeSet::new()).unwrap();
    assert_eq!(out.len(), 2);

    let distinct: BTreeSet<&str> = out.iter().map(|w| w.hazard_type.as_str()).collect();
    assert_eq!(distinct.len(), out.len());
}

#[test]
fn scenario_strictly_higher_rank_replaces_retained_entry() {
    let batch = vec![
        bulletin("a1", "Rainstorm", "Yellow"),
        bulletin("a2", "Rainstorm", "Red"),
    ];

    let out = reconcile(&batch, &BTreeSet::new()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "a2");
    assert_eq!(out[0].severity, Severity::Red);
}

#[test]
fn scenario_lower_rank_does_not_replace() {
    let batch = vec![
        bulletin("a1", "Rainstorm", "Red"),
        bulletin("a2", "Rainstorm", "Yellow"),
    ];

    let out = reconcile(&batch, &BTreeSet::new()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "a1");
    assert_eq!(out[0].severity, Severity::Red);
}

#[test]
fn scenario_equal_rank_keeps_first_seen() {
    let batch = vec![
        bulletin("a1", "Rainstorm", "Orange"),
        bulletin("a2", "Rainstorm", "Orange"),
    ];

    let out = reconcile(&batch, &BTreeSet::new()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "a1");
}

#[test]
fn scenario_tie_break_is_stable_under_unrelated_permutation() {
    // The Rainstorm tie must resolve to "a1" no matter where unrelated
    // hazard types sit in the batch.
    let permutations = vec![
        vec![
            bulletin("a1", "Rainstorm", "Orange"),
            bulletin("b1", "Typhoon", "Blue"),
            bulletin("a2", "Rainstorm", "Orange"),
        ],
        vec![
            bulletin("b1", "Typhoon", "Blue"),
            bulletin("a1", "Rainstorm", "Orange"),
            bulletin("a2", "Rainstorm", "Orange"),
        ],
        vec![
            bulletin("a1", "Rainstorm", "Orange"),
            bulletin("a2", "Rainstorm", "Orange"),
            bulletin("b1", "Typhoon", "Blue"),
        ],
    ];

    for batch in permutations {
        let out = reconcile(&batch, &BTreeSet::new()).unwrap();
        let rainstorm = out
            .iter()
            .find(|w| w.hazard_type == "Rainstorm")
            .expect("Rainstorm entry missing");
        assert_eq!(rainstorm.id, "a1");
    }
}

#[test]
fn scenario_output_preserves_first_encounter_order() {
    let batch = vec![
        bulletin("c1", "Typhoon", "White"),
        bulletin("a1", "Rainstorm", "Black"),
        bulletin("b1", "Thunderstorm", "Yellow"),
        bulletin("c2", "Typhoon", "Red"),
    ];

    let out = reconcile(&batch, &BTreeSet::new()).unwrap();
    let types: Vec<&str> = out.iter().map(|w| w.hazard_type.as_str()).collect();
    // Not alphabetical, not severity order: first-encounter order.
    assert_eq!(types, vec!["Typhoon", "Rainstorm", "Thunderstorm"]);
    assert_eq!(out[0].id, "c2");
    assert_eq!(out[0].severity, Severity::Red);
}

#[test]
fn scenario_empty_batch_yields_empty_set() {
    let mut previous = BTreeSet::new();
    previous.insert("a1".to_string());

    let out = reconcile(&[], &previous).unwrap();
    assert!(out.is_empty());
}
