//! Error types for run inputs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading identifiers or the run cache.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found, neither as given nor relative to the working directory.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse delimited input.
    #[error("failed to parse CSV {source_name}: {source}")]
    CsvParse {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// Neither identifier column is present.
    #[error("none of the columns {expected:?} found in {source_name}")]
    MissingColumn {
        expected: Vec<&'static str>,
        source_name: String,
    },

    // === Cache Errors ===
    /// Cache file is not valid JSON for the expected envelope.
    #[error("failed to decode cache {path}: {source}")]
    CacheDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to encode the cache envelope.
    #[error("failed to encode cache {path}: {source}")]
    CacheEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Cache written by a newer format.
    #[error("cache {path} has format version {found} (maximum: {max_supported})")]
    CacheVersion {
        path: PathBuf,
        found: u32,
        max_supported: u32,
    },

    /// Cache payload does not match its recorded checksum.
    #[error("cache {path} is corrupt (expected sha256 {expected}, got {actual})")]
    CacheChecksum {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
