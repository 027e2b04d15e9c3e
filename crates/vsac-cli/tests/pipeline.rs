//! Integration tests for the export pipeline.

use std::cell::Cell;
use std::path::Path;

use anyhow::anyhow;
use chrono::NaiveDate;
use tempfile::TempDir;

use vsac_cli::pipeline::{load, run_export};
use vsac_cli::types::{InputSource, RunConfig};
use vsac_client::{ClientError, Result as ClientResult, TerminologyClient, Ticket};
use vsac_ingest::{cache_path, save_cache};
use vsac_model::{Concept, InputSourceType, OutputFormat, OutputStructure, RawValueSet};
use vsac_transform::{ID_MAP_COLUMNS, TableOptions};

struct FakeClient {
    fetched: Cell<usize>,
}

impl FakeClient {
    fn new() -> Self {
        Self {
            fetched: Cell::new(0),
        }
    }
}

impl TerminologyClient for FakeClient {
    fn authenticate(&self) -> ClientResult<Ticket> {
        Ok(Ticket::new("TGT-test"))
    }

    fn fetch_value_set(&self, oid: &str, _ticket: &Ticket) -> ClientResult<RawValueSet> {
        self.fetched.set(self.fetched.get() + 1);
        if oid == "missing" {
            return Err(ClientError::ValueSetNotFound {
                oid: oid.to_string(),
            });
        }
        Ok(value_set(oid, &format!("Value set {oid}")))
    }
}

fn value_set(oid: &str, name: &str) -> RawValueSet {
    RawValueSet {
        oid: oid.to_string(),
        display_name: name.to_string(),
        version: "20240101".to_string(),
        source: Some("Steward".to_string()),
        purpose: Some("(Clinical Focus: a),(Data Element Scope: b),(Inclusion Criteria: c),(Exclusion Criteria: d)".to_string()),
        definition_type: Some("Extensional".to_string()),
        status: Some("Active".to_string()),
        revision_date: Some("2024-01-01".to_string()),
        concepts: Some(vec![
            Concept::new("44054006", "SNOMEDCT"),
            Concept::new("E11.9", "ICD10CM"),
        ]),
    }
}

struct Fixture {
    dir: TempDir,
    config: RunConfig,
}

fn fixture(oids: &[&str]) -> Fixture {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("oids.txt");
    std::fs::write(&input, oids.join("\n")).unwrap();
    let id_map_path = dir.path().join("cset.csv");
    std::fs::write(&id_map_path, format!("{}\n", ID_MAP_COLUMNS.join(","))).unwrap();
    let data_dir = dir.path().join("data");
    let config = RunConfig {
        input: InputSource::file(InputSourceType::Txt, input.display().to_string()),
        output_format: OutputFormat::TabularCsv,
        output_structure: OutputStructure::PalantirConceptSetTables,
        field_delimiter: b',',
        use_cache: false,
        cache_dir: data_dir.join("cache"),
        data_dir,
        id_map_path,
        source_name: "vsac".to_string(),
        output_date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        table_options: TableOptions::default(),
        show_progress: false,
    };
    Fixture { dir, config }
}

fn output_dir(config: &RunConfig) -> std::path::PathBuf {
    config
        .data_dir
        .join("palantir-three-file")
        .join("vsac")
        .join("2024.03.09")
        .join("output")
}

fn count_files(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    walk(dir)
}

fn walk(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            if path.is_dir() { walk(&path) } else { 1 }
        })
        .sum()
}

#[test]
fn full_run_writes_three_tables() {
    let Fixture { dir: _dir, config } = fixture(&["1.2.3", "1.2.4"]);

    let summary = run_export(&config, || Ok(FakeClient::new())).unwrap();

    assert!(!summary.from_cache);
    assert_eq!(summary.requested, 2);
    assert_eq!(summary.exported, 2);
    assert_eq!(summary.new_ids.len(), 2);
    let out = output_dir(&config);
    for name in [
        "concept_set_version_item_rv_edited.csv",
        "code_sets.csv",
        "concept_set_container_edited.csv",
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }
    let names: Vec<&str> = summary.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "concept_set_version_item_rv_edited",
            "code_sets",
            "concept_set_container_edited"
        ]
    );
    assert!(cache_path(&config.cache_dir, InputSourceType::Txt, &config.input.location).is_file());

    let id_map = std::fs::read_to_string(&config.id_map_path).unwrap();
    assert!(id_map.contains("1.2.3"));
    assert!(id_map.contains("1.2.4"));
}

#[test]
fn unsupported_plan_touches_no_files() {
    let Fixture { dir, mut config } = fixture(&["1.2.3"]);
    config.output_format = OutputFormat::Json;
    let before = std::fs::read_to_string(&config.id_map_path).unwrap();

    let err = run_export(&config, || -> anyhow::Result<FakeClient> {
        panic!("client must not be created")
    })
    .unwrap_err();

    assert!(err.to_string().contains("json"));
    assert_eq!(count_files(&config.data_dir), 0);
    assert_eq!(std::fs::read_to_string(&config.id_map_path).unwrap(), before);
    assert_eq!(count_files(dir.path()), 2);
}

#[test]
fn cache_hit_needs_no_client() {
    let Fixture { dir: _dir, mut config } = fixture(&["1.2.3"]);
    config.use_cache = true;
    let cache_file = cache_path(&config.cache_dir, InputSourceType::Txt, &config.input.location);
    save_cache(
        &cache_file,
        &config.input.location,
        &[value_set("9.9.9", "Cached")],
    )
    .unwrap();

    let summary = run_export(&config, || -> anyhow::Result<FakeClient> {
        Err(anyhow!("no credentials"))
    })
    .unwrap();

    assert!(summary.from_cache);
    assert_eq!(summary.requested, 0);
    assert_eq!(summary.exported, 1);
    assert_eq!(summary.new_ids, vec![("9.9.9".to_string(), 1)]);
}

#[test]
fn corrupt_cache_falls_back_to_fetch() {
    let Fixture { dir: _dir, mut config } = fixture(&["1.2.3"]);
    config.use_cache = true;
    let cache_file = cache_path(&config.cache_dir, InputSourceType::Txt, &config.input.location);
    std::fs::create_dir_all(&config.cache_dir).unwrap();
    std::fs::write(&cache_file, "not json").unwrap();
    assert!(load(&cache_file).is_none());

    let summary = run_export(&config, || Ok(FakeClient::new())).unwrap();

    assert!(!summary.from_cache);
    assert_eq!(summary.exported, 1);
    assert!(load(&cache_file).is_some());
}

#[test]
fn fetch_failure_writes_no_tables() {
    let Fixture { dir: _dir, config } = fixture(&["1.2.3", "missing"]);

    let err = run_export(&config, || Ok(FakeClient::new())).unwrap_err();

    assert!(format!("{err:#}").contains("missing"));
    assert!(!output_dir(&config).exists());
}
