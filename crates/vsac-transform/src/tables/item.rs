//! `concept_set_version_item_rv_edited`: one row per value set concept.

use serde::Serialize;
use vsac_model::ValueSet;
use vsac_output::TableRow;

use super::common::{CREATED_BY, RunStamp, flatten_newlines, serialize_bool};
use crate::error::Result;
use crate::id_map::IdentifierLookup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub codeset_id: u64,
    pub concept_id: String,
    pub code: String,
    #[serde(rename = "codeSystem")]
    pub code_system: String,
    #[serde(rename = "isExcluded", serialize_with = "serialize_bool")]
    pub is_excluded: bool,
    #[serde(rename = "includeDescendants", serialize_with = "serialize_bool")]
    pub include_descendants: bool,
    #[serde(rename = "includeMapped", serialize_with = "serialize_bool")]
    pub include_mapped: bool,
    pub item_id: String,
    pub annotation: String,
    pub created_by: String,
    pub created_at: String,
}

impl TableRow for ItemRow {
    const COLUMNS: &'static [&'static str] = &[
        "codeset_id",
        "concept_id",
        "code",
        "codeSystem",
        "isExcluded",
        "includeDescendants",
        "includeMapped",
        "item_id",
        "annotation",
        "created_by",
        "created_at",
    ];
}

/// Build item rows in value set then concept order.
///
/// Concepts are listed as codes only: `concept_id` stays empty and the
/// inclusion flags take the extensional defaults.
pub fn build_item_rows(
    value_sets: &[ValueSet],
    lookup: &IdentifierLookup,
    stamp: &RunStamp,
) -> Result<Vec<ItemRow>> {
    let mut rows = Vec::new();
    for value_set in value_sets {
        let codeset_id = lookup.codeset_id(&value_set.oid)?;
        for concept in &value_set.concepts {
            rows.push(ItemRow {
                codeset_id,
                concept_id: String::new(),
                code: flatten_newlines(&concept.code),
                code_system: flatten_newlines(&concept.code_system_name),
                is_excluded: false,
                include_descendants: true,
                include_mapped: false,
                item_id: stamp.next_row_id(),
                annotation: String::new(),
                created_by: CREATED_BY.to_string(),
                created_at: stamp.created_at().to_string(),
            });
        }
    }
    Ok(rows)
}
