//! Value set normalization and enclave table generation.
//!
//! - [`normalize`]: drops unusable records and makes display names unique
//! - [`id_map`]: persistent oid to surrogate id mapping
//! - [`tables`]: row builders for the concept set import tables

pub mod error;
pub mod id_map;
pub mod normalize;
pub mod tables;

pub use error::{Result, TransformError};
pub use id_map::{
    ID_MAP_COLUMNS, IdMapRow, IdentifierLookup, IdentifierMap, resolve_identifiers,
};
pub use normalize::{
    DropReason, DroppedValueSet, NormalizeReport, RenamedValueSet, normalize_value_sets,
    strip_snomed_synonyms, tidy_name,
};
pub use tables::{
    CREATED_BY, CodesetRow, ContainerRow, ContainerStage, ContainerStatus, ExportReport, ItemRow,
    PalantirTable, RunStamp, TableOptions, VSAC_TABLE, VsacRow, build_codeset_rows,
    build_container_rows, build_item_rows, build_vsac_rows, concept_set_label,
    export_palantir_tables, export_vsac_table,
};
