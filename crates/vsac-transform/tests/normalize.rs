//! Tests for value set normalization.

mod common;

use std::collections::BTreeSet;

use common::raw_value_set;
use proptest::prelude::*;
use vsac_model::Concept;
use vsac_transform::{
    ContainerStage, ContainerStatus, DropReason, RunStamp, build_container_rows,
    concept_set_label, normalize_value_sets,
};

#[test]
fn disambiguated_value_sets_come_first() {
    let concepts = || vec![Concept::new("1", "SNOMEDCT")];
    let report = normalize_value_sets(vec![
        raw_value_set("1.1", "Alpha", concepts()),
        raw_value_set("2.16.840.1.113883.3.464.1003.103.12.1001", "Diabetes", concepts()),
        raw_value_set("1.2", "Beta", concepts()),
        raw_value_set("2.16.840.1.113883.3.464.1003.103.12.1002", "Diabetes", concepts()),
    ])
    .unwrap();

    let names: Vec<&str> = report
        .value_sets
        .iter()
        .map(|vs| vs.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Diabetes 1001", "Diabetes 1002", "Alpha", "Beta"]);
}

#[test]
fn empty_concept_list_is_dropped_not_fatal() {
    let report = normalize_value_sets(vec![
        raw_value_set("1.1", "Empty", Vec::new()),
        raw_value_set("1.2", "Full", vec![Concept::new("1", "LOINC")]),
    ])
    .unwrap();

    assert_eq!(report.value_sets.len(), 1);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].reason, DropReason::NoConcepts);
    assert_eq!(report.dropped[0].oid, "1.1");
}

#[test]
fn malformed_purpose_is_fatal() {
    let mut record = raw_value_set("1.1", "Bad", vec![Concept::new("1", "LOINC")]);
    record.purpose = Some("(Clinical Focus: only one)".to_string());
    assert!(normalize_value_sets(vec![record]).is_err());
}

#[test]
fn synonym_and_plain_name_get_distinct_containers() {
    let concepts = || vec![Concept::new("1", "SNOMEDCT")];
    let report = normalize_value_sets(vec![
        raw_value_set("1.1", "Asthma SCT", concepts()),
        raw_value_set("1.2", "Asthma", concepts()),
    ])
    .unwrap();

    let rows = build_container_rows(
        &report.value_sets,
        &RunStamp::now(),
        ContainerStatus::default(),
        ContainerStage::default(),
    );
    let ids: Vec<&str> = rows.iter().map(|row| row.concept_set_id.as_str()).collect();
    assert_eq!(ids, vec!["[VSAC] Asthma 1", "[VSAC] Asthma 2"]);
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Asthma", "Asthma SCT", "Asthma (SNOMEDCT)", "Asthma 1", "Asthma 1.1", "SCT", "",
        "Asthma 1.1 (2)", "Diabetes", "Diabetes SNOMED", " Asthma", "Asthma ", "Asthma  SCT 1",
        "X SCT", "X", "X  ", "Diabetes\tSCT",
    ])
    .prop_map(str::to_string)
}

fn oid_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["1", "1.1", "2.1", "1.2", "3.1.1", "2", "1.1.1"])
        .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn output_names_are_unique(records in prop::collection::vec((oid_strategy(), name_strategy()), 0..24)) {
        let raw = records
            .iter()
            .map(|(oid, name)| raw_value_set(oid, name, vec![Concept::new("1", "LOINC")]))
            .collect();

        let report = normalize_value_sets(raw).unwrap();

        let labels: BTreeSet<String> = report
            .value_sets
            .iter()
            .map(|vs| concept_set_label(&vs.display_name))
            .collect();
        prop_assert_eq!(labels.len(), report.value_sets.len());
        let oids: BTreeSet<&str> = records.iter().map(|(oid, _)| oid.as_str()).collect();
        prop_assert_eq!(report.value_sets.len(), oids.len());
    }
}
