use thiserror::Error;

use crate::export::{OutputFormat, OutputStructure};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("value set {oid} is missing required field '{field}'")]
    MissingField { oid: String, field: &'static str },

    #[error("value set {oid} has a malformed purpose: {source}")]
    Purpose {
        oid: String,
        #[source]
        source: PurposeFormatError,
    },

    #[error("value set {oid} has no concepts")]
    NoConcepts { oid: String },

    #[error("output structure '{structure}' is not implemented for output format '{format}'")]
    UnsupportedExport {
        format: OutputFormat,
        structure: OutputStructure,
    },

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// The purpose string did not split into the four expected sub-fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected 4 sub-fields, found {found}")]
pub struct PurposeFormatError {
    pub found: usize,
}

pub type Result<T> = std::result::Result<T, ModelError>;
