//! Shared constants and helpers for the enclave tables.

use std::cell::Cell;

use chrono::{DateTime, Local, Utc};
use serde::Serializer;
use uuid::Uuid;

/// Enclave user recorded as creator of every imported row.
pub const CREATED_BY: &str = "a39723f3-dc9c-48ce-90ff-06891c29114f";

/// Enclave project that owns bulk imported code sets.
pub const PROJECT: &str = "RP-4A9E27";

pub const LABEL_PREFIX: &str = "[VSAC] ";

/// Timestamp format of enclave `created_at` columns.
pub const ENCLAVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Timestamp format of the `Accessed:` provenance entry.
pub const ACCESSED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
enum RowIds {
    Random,
    Sequential(Cell<u128>),
}

/// Timestamps and row id source shared by all tables of one run.
#[derive(Debug, Clone)]
pub struct RunStamp {
    created_at: String,
    accessed: String,
    row_ids: RowIds,
}

impl RunStamp {
    /// Stamp for the current instant with random v4 row ids.
    pub fn now() -> Self {
        Self::at(Utc::now(), Local::now())
    }

    pub fn at(created_at: DateTime<Utc>, accessed: DateTime<Local>) -> Self {
        Self {
            created_at: created_at.format(ENCLAVE_TIMESTAMP_FORMAT).to_string(),
            accessed: accessed.format(ACCESSED_FORMAT).to_string(),
            row_ids: RowIds::Random,
        }
    }

    /// Fixed timestamps and sequential row ids, for reproducible output.
    pub fn fixed(created_at: impl Into<String>, accessed: impl Into<String>) -> Self {
        Self {
            created_at: created_at.into(),
            accessed: accessed.into(),
            row_ids: RowIds::Sequential(Cell::new(1)),
        }
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn accessed(&self) -> &str {
        &self.accessed
    }

    /// Next row identifier, formatted as a UUID.
    pub fn next_row_id(&self) -> String {
        match &self.row_ids {
            RowIds::Random => Uuid::new_v4().to_string(),
            RowIds::Sequential(next) => {
                let id = next.get();
                next.set(id + 1);
                Uuid::from_u128(id).to_string()
            }
        }
    }
}

/// Replace line breaks so every value stays on one line.
pub fn flatten_newlines(value: &str) -> String {
    value
        .replace("\r\n", " - ")
        .replace(['\n', '\r'], " - ")
}

/// `[VSAC] ` plus the trimmed display name.
pub fn concept_set_label(display_name: &str) -> String {
    format!("{LABEL_PREFIX}{}", display_name.trim())
}

/// Booleans are written the way the enclave import expects them.
pub fn serialize_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}
