//! `vsac_csv`: VSAC-oriented layout with one row per value set code system.

use serde::Serialize;
use vsac_model::ValueSet;
use vsac_output::TableRow;

use super::common::{RunStamp, concept_set_label, flatten_newlines};

/// Maximum number of codes per `codes*` cell.
pub const CODES_PER_CELL: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VsacRow {
    pub name: String,
    #[serde(rename = "nameVSAC")]
    pub name_vsac: String,
    pub oid: String,
    #[serde(rename = "codeSystem")]
    pub code_system: String,
    pub limitations: String,
    pub intention: String,
    pub provenance: String,
    pub codes: String,
    pub codes2: String,
    pub codes3: String,
}

impl TableRow for VsacRow {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "nameVSAC",
        "oid",
        "codeSystem",
        "limitations",
        "intention",
        "provenance",
        "codes",
        "codes2",
        "codes3",
    ];
}

fn vsac_provenance(value_set: &ValueSet, accessed: &str) -> String {
    [
        format!("Steward: {}", value_set.steward),
        format!("OID: {}", value_set.oid),
        format!("Code System(s): {}", value_set.code_systems().join(",")),
        format!("Definition Type: {}", value_set.definition_type),
        format!("Definition Version: {}", value_set.version),
        format!("Accessed: {accessed}"),
    ]
    .join("; ")
}

/// Build one row per (value set, code system).
///
/// Codes are joined with `code_delimiter`. The first two chunks of
/// [`CODES_PER_CELL`] codes go to `codes` and `codes2`; everything after
/// that lands in `codes3`.
pub fn build_vsac_rows(value_sets: &[ValueSet], stamp: &RunStamp, code_delimiter: &str) -> Vec<VsacRow> {
    let mut rows = Vec::new();
    for value_set in value_sets {
        let provenance = flatten_newlines(&vsac_provenance(value_set, stamp.accessed()));
        for system in value_set.code_systems() {
            let codes: Vec<&str> = value_set
                .concepts
                .iter()
                .filter(|concept| concept.code_system_name == system)
                .map(|concept| concept.code.as_str())
                .collect();
            let (first, rest) = codes.split_at(codes.len().min(CODES_PER_CELL));
            let (second, third) = rest.split_at(rest.len().min(CODES_PER_CELL));
            rows.push(VsacRow {
                name: flatten_newlines(&value_set.display_name),
                name_vsac: flatten_newlines(&concept_set_label(&value_set.display_name)),
                oid: value_set.oid.clone(),
                code_system: flatten_newlines(system),
                limitations: flatten_newlines(value_set.purpose.limitations()),
                intention: flatten_newlines(&value_set.purpose.intention()),
                provenance: provenance.clone(),
                codes: flatten_newlines(&first.join(code_delimiter)),
                codes2: flatten_newlines(&second.join(code_delimiter)),
                codes3: flatten_newlines(&third.join(code_delimiter)),
            });
        }
    }
    rows
}
