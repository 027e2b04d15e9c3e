//! `concept_set_container_edited`: one container per value set.

use std::fmt;

use serde::Serialize;
use vsac_model::ValueSet;
use vsac_output::TableRow;

use super::common::{CREATED_BY, RunStamp, concept_set_label, flatten_newlines, serialize_bool};

/// Container `status` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ContainerStatus {
    #[serde(rename = "Finished")]
    Finished,
    #[default]
    #[serde(rename = "Under Construction")]
    UnderConstruction,
    #[serde(rename = "N3C Validation Complete")]
    N3cValidationComplete,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "Finished",
            Self::UnderConstruction => "Under Construction",
            Self::N3cValidationComplete => "N3C Validation Complete",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container review `stage` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ContainerStage {
    #[serde(rename = "Finished")]
    Finished,
    #[default]
    #[serde(rename = "Awaiting Editing")]
    AwaitingEditing,
    #[serde(rename = "Candidate for N3C Review")]
    CandidateForN3cReview,
    #[serde(rename = "Awaiting N3C Committee Review")]
    AwaitingN3cCommitteeReview,
    #[serde(rename = "Awaiting SME Review")]
    AwaitingSmeReview,
    #[serde(rename = "Under N3C Committee Review")]
    UnderN3cCommitteeReview,
    #[serde(rename = "Under SME Review")]
    UnderSmeReview,
    #[serde(rename = "N3C Validation Complete")]
    N3cValidationComplete,
    #[serde(rename = "Awaiting Informatician Review")]
    AwaitingInformaticianReview,
    #[serde(rename = "Under Informatician Review")]
    UnderInformaticianReview,
}

impl ContainerStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "Finished",
            Self::AwaitingEditing => "Awaiting Editing",
            Self::CandidateForN3cReview => "Candidate for N3C Review",
            Self::AwaitingN3cCommitteeReview => "Awaiting N3C Committee Review",
            Self::AwaitingSmeReview => "Awaiting SME Review",
            Self::UnderN3cCommitteeReview => "Under N3C Committee Review",
            Self::UnderSmeReview => "Under SME Review",
            Self::N3cValidationComplete => "N3C Validation Complete",
            Self::AwaitingInformaticianReview => "Awaiting Informatician Review",
            Self::UnderInformaticianReview => "Under Informatician Review",
        }
    }
}

impl fmt::Display for ContainerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRow {
    pub concept_set_id: String,
    pub concept_set_name: String,
    pub project_id: String,
    pub assigned_informatician: String,
    pub assigned_sme: String,
    pub status: ContainerStatus,
    pub stage: ContainerStage,
    pub intention: String,
    pub n3c_reviewer: String,
    pub alias: Option<String>,
    #[serde(serialize_with = "serialize_bool")]
    pub archived: bool,
    pub created_by: String,
    pub created_at: String,
}

impl TableRow for ContainerRow {
    const COLUMNS: &'static [&'static str] = &[
        "concept_set_id",
        "concept_set_name",
        "project_id",
        "assigned_informatician",
        "assigned_sme",
        "status",
        "stage",
        "intention",
        "n3c_reviewer",
        "alias",
        "archived",
        "created_by",
        "created_at",
    ];
}

/// Containers are keyed by label, so no surrogate id is needed here.
pub fn build_container_rows(
    value_sets: &[ValueSet],
    stamp: &RunStamp,
    status: ContainerStatus,
    stage: ContainerStage,
) -> Vec<ContainerRow> {
    value_sets
        .iter()
        .map(|value_set| {
            let label = flatten_newlines(&concept_set_label(&value_set.display_name));
            ContainerRow {
                concept_set_id: label.clone(),
                concept_set_name: label,
                project_id: String::new(),
                assigned_informatician: CREATED_BY.to_string(),
                assigned_sme: CREATED_BY.to_string(),
                status,
                stage,
                intention: flatten_newlines(&value_set.purpose.intention()),
                n3c_reviewer: String::new(),
                alias: None,
                archived: false,
                created_by: CREATED_BY.to_string(),
                created_at: stamp.created_at().to_string(),
            }
        })
        .collect()
}
