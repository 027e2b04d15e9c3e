//! Integration tests for identifier sources and the run cache.

use std::fs;

use tempfile::tempdir;
use vsac_ingest::{
    IngestError, cache_path, load_cache, read_csv_oids, read_txt_oids, resolve_input_path,
    save_cache,
};
use vsac_model::{Concept, InputSourceType, RawValueSet};

fn sample_value_sets() -> Vec<RawValueSet> {
    vec![
        RawValueSet {
            oid: "2.16.840.1.113883.3.464.1003.103.12.1001".to_string(),
            display_name: "Diabetes".to_string(),
            version: "20210220".to_string(),
            source: Some("NCQA".to_string()),
            purpose: Some("(a),(b),(c),(d)".to_string()),
            definition_type: Some("Extensional".to_string()),
            concepts: Some(vec![Concept::new("44054006", "SNOMEDCT")]),
            ..RawValueSet::default()
        },
        RawValueSet {
            oid: "1.2.3".to_string(),
            display_name: "Empty".to_string(),
            version: "1".to_string(),
            ..RawValueSet::default()
        },
    ]
}

#[test]
fn reads_txt_identifiers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("oids.txt");
    fs::write(&path, "1.2.3\n\n1.2.4  \n1.2.3\n").unwrap();

    let list = read_txt_oids(&path).unwrap();

    assert_eq!(list.oids, vec!["1.2.3", "1.2.4"]);
    assert_eq!(list.duplicates, 1);
}

#[test]
fn reads_csv_identifiers_with_do_not_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("oids.csv");
    fs::write(&path, "Name,OID,DoNotLoad\nA,1.1,False\nB,1.2,True\nC,1.3,\n").unwrap();

    let list = read_csv_oids(&path).unwrap();

    assert_eq!(list.oids, vec!["1.1", "1.3"]);
    assert_eq!(list.skipped_do_not_load, 1);
}

#[test]
fn missing_input_file_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    let err = resolve_input_path(&path).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(read_txt_oids(&path).is_err());
}

#[test]
fn cache_round_trip() {
    let dir = tempdir().unwrap();
    let path = cache_path(dir.path(), InputSourceType::Txt, "oids.txt");
    let value_sets = sample_value_sets();

    save_cache(&path, "oids.txt", &value_sets).unwrap();
    let loaded = load_cache(&path).unwrap().expect("cache present");

    assert_eq!(loaded, value_sets);
}

#[test]
fn missing_cache_is_a_miss() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("value_sets_txt_none.json");
    assert!(load_cache(&path).unwrap().is_none());
}

#[test]
fn tampered_cache_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache.json");
    save_cache(&path, "oids.txt", &sample_value_sets()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replace("Diabetes", "Diabetic")).unwrap();

    let err = load_cache(&path).unwrap_err();
    assert!(matches!(err, IngestError::CacheChecksum { .. }));
}

#[test]
fn garbage_cache_is_a_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache.json");
    fs::write(&path, b"\x80\x04pickle").unwrap();

    let err = load_cache(&path).unwrap_err();
    assert!(matches!(err, IngestError::CacheDecode { .. }));
}
