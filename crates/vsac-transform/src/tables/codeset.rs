//! `code_sets`: one version row per value set.

use serde::Serialize;
use vsac_model::ValueSet;
use vsac_output::TableRow;

use super::common::{
    CREATED_BY, PROJECT, RunStamp, concept_set_label, flatten_newlines, serialize_bool,
};
use crate::error::Result;
use crate::id_map::IdentifierLookup;

pub const SOURCE_APPLICATION: &str = "EXTERNAL VSAC";
pub const CODESET_COMMENTS: &str = "Exported from VSAC and bulk imported to N3C.";
pub const UPDATE_MESSAGE: &str = "Initial version.";
pub const CODESET_STATUS: &str = "Under Construction";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodesetRow {
    pub codeset_id: u64,
    pub concept_set_name: String,
    pub concept_set_version_title: String,
    pub project: String,
    pub source_application: String,
    pub source_application_version: String,
    pub created_at: String,
    pub atlas_json: String,
    #[serde(serialize_with = "serialize_bool")]
    pub is_most_recent_version: bool,
    pub version: u32,
    pub comments: String,
    pub intention: String,
    pub limitations: String,
    pub issues: String,
    pub update_message: String,
    pub status: String,
    pub has_review: String,
    pub reviewed_by: String,
    pub created_by: String,
    pub authority: String,
    pub provenance: String,
    pub atlas_json_resource_url: String,
    pub parent_version_id: String,
    #[serde(serialize_with = "serialize_bool")]
    pub is_draft: bool,
    pub enclave_codeset_id: String,
    pub enclave_codeset_id_updated_at: String,
}

impl TableRow for CodesetRow {
    const COLUMNS: &'static [&'static str] = &[
        "codeset_id",
        "concept_set_name",
        "concept_set_version_title",
        "project",
        "source_application",
        "source_application_version",
        "created_at",
        "atlas_json",
        "is_most_recent_version",
        "version",
        "comments",
        "intention",
        "limitations",
        "issues",
        "update_message",
        "status",
        "has_review",
        "reviewed_by",
        "created_by",
        "authority",
        "provenance",
        "atlas_json_resource_url",
        "parent_version_id",
        "is_draft",
        "enclave_codeset_id",
        "enclave_codeset_id_updated_at",
    ];
}

/// `Steward: ..; OID: ..; dih_id: ..; Code System(s): ..; ...; Accessed: ..`
pub fn codeset_provenance(value_set: &ValueSet, codeset_id: u64, accessed: &str) -> String {
    [
        format!("Steward: {}", value_set.steward),
        format!("OID: {}", value_set.oid),
        format!("dih_id: {codeset_id}"),
        format!("Code System(s): {}", value_set.code_systems().join(",")),
        format!("Definition Type: {}", value_set.definition_type),
        format!("Definition Version: {}", value_set.version),
        format!("Accessed: {accessed}"),
    ]
    .join("; ")
}

pub fn build_codeset_rows(
    value_sets: &[ValueSet],
    lookup: &IdentifierLookup,
    stamp: &RunStamp,
) -> Result<Vec<CodesetRow>> {
    value_sets
        .iter()
        .map(|value_set| {
            let codeset_id = lookup.codeset_id(&value_set.oid)?;
            let label = concept_set_label(&value_set.display_name);
            Ok(CodesetRow {
                codeset_id,
                concept_set_version_title: flatten_newlines(&format!("{label} (v1)")),
                concept_set_name: flatten_newlines(&label),
                project: PROJECT.to_string(),
                source_application: SOURCE_APPLICATION.to_string(),
                source_application_version: String::new(),
                created_at: stamp.created_at().to_string(),
                atlas_json: String::new(),
                is_most_recent_version: true,
                version: 1,
                comments: CODESET_COMMENTS.to_string(),
                intention: flatten_newlines(&value_set.purpose.intention()),
                limitations: flatten_newlines(value_set.purpose.limitations()),
                issues: String::new(),
                update_message: UPDATE_MESSAGE.to_string(),
                status: CODESET_STATUS.to_string(),
                has_review: String::new(),
                reviewed_by: String::new(),
                created_by: CREATED_BY.to_string(),
                authority: flatten_newlines(&value_set.steward),
                provenance: flatten_newlines(&codeset_provenance(
                    value_set,
                    codeset_id,
                    stamp.accessed(),
                )),
                atlas_json_resource_url: String::new(),
                parent_version_id: String::new(),
                is_draft: true,
                enclave_codeset_id: String::new(),
                enclave_codeset_id_updated_at: String::new(),
            })
        })
        .collect()
}
