//! Error types for normalization, identifier mapping and table building.

use std::path::PathBuf;

use thiserror::Error;
use vsac_model::ModelError;
use vsac_output::OutputError;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A value set failed validation.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The identifier map file does not exist.
    #[error("identifier map not found: {path}")]
    IdMapNotFound { path: PathBuf },

    /// The identifier map could not be read or written.
    #[error("identifier map I/O failed for {path}: {source}")]
    IdMapIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identifier map is not valid CSV.
    #[error("identifier map {path} is malformed: {source}")]
    IdMapCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required identifier map column is absent.
    #[error("identifier map {path} is missing column '{column}'")]
    IdMapMissingColumn { path: PathBuf, column: &'static str },

    /// An `internal_id` cell is not a non-negative integer.
    #[error("identifier map {path} line {line}: invalid internal_id '{value}'")]
    InvalidInternalId {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// The same oid appears on two rows.
    #[error("identifier map {path} maps oid {oid} more than once")]
    DuplicateOid { path: PathBuf, oid: String },

    /// A value set has no surrogate id.
    #[error("no internal_id assigned for oid {oid}")]
    UnknownOid { oid: String },

    /// Writing a finished table failed.
    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
