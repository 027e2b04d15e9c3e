//! Builders for the enclave concept set import tables.
//!
//! Builders are pure: they read the normalized value sets and the surrogate
//! id lookup and return rows. Timestamps and row ids come from a
//! [`RunStamp`] so that one run shares a single creation time.

mod codeset;
mod common;
mod container;
mod item;
mod vsac;

use tracing::info_span;
use vsac_model::ValueSet;
use vsac_output::TableSink;

use crate::error::Result;
use crate::id_map::IdentifierLookup;

pub use codeset::{
    CODESET_COMMENTS, CODESET_STATUS, CodesetRow, SOURCE_APPLICATION, UPDATE_MESSAGE,
    build_codeset_rows, codeset_provenance,
};
pub use common::{
    ACCESSED_FORMAT, CREATED_BY, ENCLAVE_TIMESTAMP_FORMAT, LABEL_PREFIX, PROJECT, RunStamp,
    concept_set_label, flatten_newlines,
};
pub use container::{ContainerRow, ContainerStage, ContainerStatus, build_container_rows};
pub use item::{ItemRow, build_item_rows};
pub use vsac::{CODES_PER_CELL, VsacRow, build_vsac_rows};

/// File stem of the VSAC-oriented table.
pub const VSAC_TABLE: &str = "vsac_csv";

/// The three tables of the enclave import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PalantirTable {
    Item,
    Codeset,
    Container,
}

impl PalantirTable {
    pub const ALL: [Self; 3] = [Self::Item, Self::Codeset, Self::Container];

    /// Enclave table name, also used as the file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Item => "concept_set_version_item_rv_edited",
            Self::Codeset => "code_sets",
            Self::Container => "concept_set_container_edited",
        }
    }
}

/// Knobs for values the import schema lets us choose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub container_status: ContainerStatus,
    pub container_stage: ContainerStage,
    /// Separator between codes inside one `vsac_csv` cell.
    pub code_delimiter: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            container_status: ContainerStatus::default(),
            container_stage: ContainerStage::default(),
            code_delimiter: "|".to_string(),
        }
    }
}

/// Row counts of an export, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub tables: Vec<(&'static str, usize)>,
}

impl ExportReport {
    pub fn rows(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, rows)| *rows)
    }
}

/// Build the item, codeset and container tables and hand each to `sink`
/// as soon as it is built.
pub fn export_palantir_tables<S: TableSink>(
    value_sets: &[ValueSet],
    lookup: &IdentifierLookup,
    stamp: &RunStamp,
    options: &TableOptions,
    sink: &mut S,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();
    for table in PalantirTable::ALL {
        let _span = info_span!("table", name = table.name()).entered();
        let rows = match table {
            PalantirTable::Item => {
                let rows = build_item_rows(value_sets, lookup, stamp)?;
                sink.write_table(table.name(), &rows)?;
                rows.len()
            }
            PalantirTable::Codeset => {
                let rows = build_codeset_rows(value_sets, lookup, stamp)?;
                sink.write_table(table.name(), &rows)?;
                rows.len()
            }
            PalantirTable::Container => {
                let rows = build_container_rows(
                    value_sets,
                    stamp,
                    options.container_status,
                    options.container_stage,
                );
                sink.write_table(table.name(), &rows)?;
                rows.len()
            }
        };
        report.tables.push((table.name(), rows));
    }
    Ok(report)
}

/// Build and write the `vsac_csv` table.
pub fn export_vsac_table<S: TableSink>(
    value_sets: &[ValueSet],
    stamp: &RunStamp,
    options: &TableOptions,
    sink: &mut S,
) -> Result<ExportReport> {
    let rows = build_vsac_rows(value_sets, stamp, &options.code_delimiter);
    sink.write_table(VSAC_TABLE, &rows)?;
    Ok(ExportReport {
        tables: vec![(VSAC_TABLE, rows.len())],
    })
}
