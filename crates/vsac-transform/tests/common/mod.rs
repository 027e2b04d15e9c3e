//! Fixtures shared by the transform tests.

#![allow(dead_code)]

use vsac_model::{Concept, RawValueSet, ValueSet};
use vsac_output::{Result, TableRow, TableSink, write_rows};

pub const EXAMPLE_PURPOSE: &str =
    "(Clinical Focus: X),(Data Element Scope: Y),(Inclusion Criteria: Z),(Exclusion Criteria: W)";

pub fn raw_value_set(oid: &str, name: &str, concepts: Vec<Concept>) -> RawValueSet {
    RawValueSet {
        oid: oid.to_string(),
        display_name: name.to_string(),
        version: "20210220".to_string(),
        source: Some("Steward".to_string()),
        purpose: Some(EXAMPLE_PURPOSE.to_string()),
        definition_type: Some("Extensional".to_string()),
        status: Some("Active".to_string()),
        revision_date: None,
        concepts: Some(concepts),
    }
}

pub fn value_set(oid: &str, name: &str, concepts: Vec<Concept>) -> ValueSet {
    ValueSet::from_raw(raw_value_set(oid, name, concepts)).expect("valid fixture")
}

/// Example record: oid 1.2.3, name Foo, one SNOMEDCT concept.
pub fn example_value_set() -> ValueSet {
    value_set("1.2.3", "Foo", vec![Concept::new("123", "SNOMEDCT")])
}

/// Sink that keeps every table as CSV text.
#[derive(Default)]
pub struct MemorySink {
    pub tables: Vec<(String, String)>,
}

impl MemorySink {
    pub fn table(&self, name: &str) -> &str {
        self.tables
            .iter()
            .find(|(table, _)| table == name)
            .map(|(_, text)| text.as_str())
            .expect("table written")
    }
}

impl TableSink for MemorySink {
    fn write_table<R: TableRow>(&mut self, name: &str, rows: &[R]) -> Result<()> {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, b',', rows).expect("serialize rows");
        self.tables
            .push((name.to_string(), String::from_utf8(buffer).expect("utf-8")));
        Ok(())
    }
}
