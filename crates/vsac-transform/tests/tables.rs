//! Tests for the enclave table builders.

mod common;

use std::collections::BTreeSet;

use common::{MemorySink, example_value_set, value_set};
use vsac_model::Concept;
use vsac_transform::{
    CREATED_BY, ContainerStage, ContainerStatus, IdentifierLookup, PalantirTable, RunStamp,
    TableOptions, TransformError, build_codeset_rows, build_container_rows, build_item_rows,
    build_vsac_rows, export_palantir_tables,
};

const CREATED_AT: &str = "2021-03-03T13:24:48.000Z";
const ACCESSED: &str = "2021-03-03 08:24:48";

fn stamp() -> RunStamp {
    RunStamp::fixed(CREATED_AT, ACCESSED)
}

fn lookup() -> IdentifierLookup {
    IdentifierLookup::from_pairs([("1.2.3", 7), ("1.2.4", 8)])
}

#[test]
fn example_codeset_and_item_rows() {
    let value_sets = vec![example_value_set()];

    let codesets = build_codeset_rows(&value_sets, &lookup(), &stamp()).unwrap();
    let items = build_item_rows(&value_sets, &lookup(), &stamp()).unwrap();

    assert_eq!(codesets.len(), 1);
    let codeset = &codesets[0];
    assert_eq!(codeset.codeset_id, 7);
    assert_eq!(codeset.intention, "X; Y; Z");
    assert_eq!(codeset.limitations, "W");
    assert_eq!(codeset.concept_set_name, "[VSAC] Foo");
    assert_eq!(codeset.concept_set_version_title, "[VSAC] Foo (v1)");
    assert_eq!(codeset.authority, "Steward");
    assert_eq!(
        codeset.provenance,
        "Steward: Steward; OID: 1.2.3; dih_id: 7; Code System(s): SNOMEDCT; \
         Definition Type: Extensional; Definition Version: 20210220; Accessed: 2021-03-03 08:24:48"
    );

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].codeset_id, 7);
    assert_eq!(items[0].code, "123");
    assert_eq!(items[0].code_system, "SNOMEDCT");
    assert_eq!(items[0].created_by, CREATED_BY);
    assert_eq!(items[0].created_at, CREATED_AT);
}

#[test]
fn item_ids_are_unique_across_table() {
    let value_sets = vec![
        value_set(
            "1.2.3",
            "Foo",
            vec![Concept::new("1", "SNOMEDCT"), Concept::new("2", "SNOMEDCT")],
        ),
        value_set("1.2.4", "Bar", vec![Concept::new("1", "ICD10CM")]),
    ];
    let stamp = RunStamp::now();

    let items = build_item_rows(&value_sets, &lookup(), &stamp).unwrap();

    let ids: BTreeSet<&str> = items.iter().map(|row| row.item_id.as_str()).collect();
    assert_eq!(ids.len(), items.len());
}

#[test]
fn builders_are_repeatable() {
    let value_sets = vec![example_value_set()];

    let first = build_codeset_rows(&value_sets, &lookup(), &RunStamp::now()).unwrap();
    let second = build_codeset_rows(&value_sets, &lookup(), &RunStamp::now()).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.codeset_id, b.codeset_id);
        assert_eq!(a.concept_set_name, b.concept_set_name);
        assert_eq!(a.intention, b.intention);
        assert_eq!(a.limitations, b.limitations);
    }
    assert_eq!(value_sets[0].display_name, "Foo");
}

#[test]
fn unknown_oid_is_fatal() {
    let value_sets = vec![value_set("9.9", "Nope", vec![Concept::new("1", "LOINC")])];
    let err = build_item_rows(&value_sets, &lookup(), &stamp()).unwrap_err();
    assert!(matches!(err, TransformError::UnknownOid { ref oid } if oid == "9.9"));
}

#[test]
fn newlines_never_reach_output() {
    let mut record = example_value_set();
    record.display_name = "Multi\nline\r\nname".to_string();
    record.steward = "Steward\rInc".to_string();
    let value_sets = vec![record];
    let mut sink = MemorySink::default();

    export_palantir_tables(
        &value_sets,
        &lookup(),
        &stamp(),
        &TableOptions::default(),
        &mut sink,
    )
    .unwrap();

    for (name, text) in &sink.tables {
        for line in text.lines().skip(1) {
            assert!(!line.contains('"'), "{name} row was quoted: {line}");
        }
        assert_eq!(text.matches('\n').count(), 2, "{name}");
    }
    assert!(sink.table("code_sets").contains("[VSAC] Multi - line - name"));
    assert!(sink.table("code_sets").contains("Steward - Inc"));
}

#[test]
fn export_writes_tables_in_order() {
    let value_sets = vec![example_value_set()];
    let mut sink = MemorySink::default();

    let report = export_palantir_tables(
        &value_sets,
        &lookup(),
        &stamp(),
        &TableOptions::default(),
        &mut sink,
    )
    .unwrap();

    let names: Vec<&str> = sink.tables.iter().map(|(name, _)| name.as_str()).collect();
    let expected: Vec<&str> = PalantirTable::ALL.iter().map(PalantirTable::name).collect();
    assert_eq!(names, expected);
    assert_eq!(report.rows("code_sets"), Some(1));

    let items = sink.table("concept_set_version_item_rv_edited");
    let mut lines = items.lines();
    assert_eq!(
        lines.next(),
        Some(
            "codeset_id,concept_id,code,codeSystem,isExcluded,includeDescendants,includeMapped,\
             item_id,annotation,created_by,created_at"
        )
    );
    assert_eq!(
        lines.next(),
        Some(
            "7,,123,SNOMEDCT,False,True,False,00000000-0000-0000-0000-000000000001,,\
             a39723f3-dc9c-48ce-90ff-06891c29114f,2021-03-03T13:24:48.000Z"
        )
    );
}

#[test]
fn container_table_snapshot() {
    let value_sets = vec![example_value_set()];
    let rows = build_container_rows(
        &value_sets,
        &stamp(),
        ContainerStatus::default(),
        ContainerStage::default(),
    );
    let mut buffer = Vec::new();
    vsac_output::write_rows(&mut buffer, b',', &rows).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    insta::assert_snapshot!(text.trim_end(), @r"
    concept_set_id,concept_set_name,project_id,assigned_informatician,assigned_sme,status,stage,intention,n3c_reviewer,alias,archived,created_by,created_at
    [VSAC] Foo,[VSAC] Foo,,a39723f3-dc9c-48ce-90ff-06891c29114f,a39723f3-dc9c-48ce-90ff-06891c29114f,Under Construction,Awaiting Editing,X; Y; Z,,,False,a39723f3-dc9c-48ce-90ff-06891c29114f,2021-03-03T13:24:48.000Z
    ");
}

#[test]
fn vsac_rows_split_codes_per_system() {
    let mut concepts: Vec<Concept> = (0..4500)
        .map(|n| Concept::new(n.to_string(), "ICD10CM"))
        .collect();
    concepts.insert(1, Concept::new("44054006", "SNOMEDCT"));
    let value_sets = vec![value_set("1.2.3", "Big", concepts)];

    let rows = build_vsac_rows(&value_sets, &stamp(), "|");

    assert_eq!(rows.len(), 2);
    let icd = &rows[0];
    assert_eq!(icd.code_system, "ICD10CM");
    assert_eq!(icd.name_vsac, "[VSAC] Big");
    assert_eq!(icd.codes.split('|').count(), 2000);
    assert_eq!(icd.codes2.split('|').count(), 2000);
    assert_eq!(icd.codes3.split('|').count(), 500);
    assert!(icd.codes.starts_with("0|1|2|"));
    assert!(icd.codes3.ends_with("|4499"));
    assert!(!icd.provenance.contains("dih_id"));
    assert_eq!(rows[1].code_system, "SNOMEDCT");
    assert_eq!(rows[1].codes, "44054006");
    assert!(rows[1].codes2.is_empty());
}
