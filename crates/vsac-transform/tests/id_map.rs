//! Tests for surrogate id assignment across runs.

mod common;

use std::fs;

use common::value_set;
use tempfile::tempdir;
use vsac_model::Concept;
use vsac_transform::{IdentifierMap, TransformError, resolve_identifiers};

const HEADER: &str =
    "source_id_field,oid,ccsr_code,internal_id,internal_source,cset_source,grouped_by_bids,concept_id\n";

#[test]
fn new_oid_gets_next_id_and_is_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cset.csv");
    fs::write(
        &path,
        format!("{HEADER}oid,A,,1,old.csv,VSAC,,\noid,B,,2,old.csv,VSAC,,\n"),
    )
    .unwrap();
    let value_sets = vec![
        value_set("A", "First", vec![Concept::new("1", "LOINC")]),
        value_set("C", "Third", vec![Concept::new("3", "LOINC")]),
    ];

    let lookup = resolve_identifiers(&path, &value_sets, "new.csv").unwrap();

    assert_eq!(lookup.get("A"), Some(1));
    assert_eq!(lookup.get("B"), Some(2));
    assert_eq!(lookup.get("C"), Some(3));
    assert_eq!(lookup.newly_assigned(), &[("C".to_string(), 3)]);

    let reloaded = IdentifierMap::load(&path).unwrap();
    assert_eq!(reloaded.rows().len(), 3);
    assert_eq!(reloaded.get("C"), Some(3));
    let new_row = &reloaded.rows()[2];
    assert_eq!(new_row.internal_source, "new.csv");
    assert_eq!(new_row.cset_source, "VSAC");
}

#[test]
fn unchanged_map_is_not_rewritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cset.csv");
    let original = format!("{HEADER}oid,A,,1.0,old.csv,VSAC,,\n");
    fs::write(&path, &original).unwrap();
    let value_sets = vec![value_set("A", "First", vec![Concept::new("1", "LOINC")])];

    let lookup = resolve_identifiers(&path, &value_sets, "new.csv").unwrap();

    assert_eq!(lookup.get("A"), Some(1));
    assert!(lookup.newly_assigned().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn save_then_load_keeps_mapping() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cset.csv");
    fs::write(&path, format!("{HEADER}ccsr,,CIR001,4,sheet,CCSR,True,\n")).unwrap();

    let mut map = IdentifierMap::load(&path).unwrap();
    let assigned = map.assign_missing(["2.16.1", "2.16.2"], "oids.txt");
    map.save(&path).unwrap();
    let reloaded = IdentifierMap::load(&path).unwrap();

    assert_eq!(assigned, vec![("2.16.1".to_string(), 5), ("2.16.2".to_string(), 6)]);
    assert_eq!(reloaded.lookup(), map.lookup());
    assert_eq!(reloaded.rows(), map.rows());
    assert!(!dir.path().join("cset.csv.tmp").exists());
}

#[test]
fn missing_map_is_fatal() {
    let dir = tempdir().unwrap();
    let err = resolve_identifiers(&dir.path().join("cset.csv"), &[], "x").unwrap_err();
    assert!(matches!(err, TransformError::IdMapNotFound { .. }));
}
