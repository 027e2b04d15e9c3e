//! Run cache of raw value sets.
//!
//! The cache is keyed by input source type and name. It is written after
//! every fetch and only read when the caller asks for it.
//!
//! Format: a JSON envelope holding the value sets and the SHA-256 of their
//! serialized form, so a truncated or hand-edited file is detected on load.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use vsac_model::{InputSourceType, RawValueSet};

use crate::error::{IngestError, Result};

/// Current cache envelope version.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    format_version: u32,
    source: String,
    created_at: DateTime<Utc>,
    payload_sha256: String,
    value_sets: Vec<RawValueSet>,
}

/// Cache file name for a source, e.g. `value_sets_txt_data-oids.txt.json`.
pub fn cache_file_name(source_type: InputSourceType, source_name: &str) -> String {
    let sanitized: String = source_name
        .chars()
        .filter(|ch| *ch != '\\')
        .map(|ch| match ch {
            ' ' | '/' | ':' | '?' | '&' | '=' | '#' => '-',
            other => other,
        })
        .collect();
    format!("value_sets_{source_type}_{sanitized}.json")
}

/// Full cache path under `cache_dir`.
pub fn cache_path(cache_dir: &Path, source_type: InputSourceType, source_name: &str) -> PathBuf {
    cache_dir.join(cache_file_name(source_type, source_name))
}

/// Load cached value sets. Returns `Ok(None)` when no cache file exists.
///
/// # Errors
///
/// Fails when the file cannot be read or decoded, was written by a newer
/// format, or its payload checksum does not match.
pub fn load_cache(path: &Path) -> Result<Option<Vec<RawValueSet>>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let envelope: CacheEnvelope =
        serde_json::from_slice(&bytes).map_err(|source| IngestError::CacheDecode {
            path: path.to_path_buf(),
            source,
        })?;
    if envelope.format_version > CACHE_FORMAT_VERSION {
        return Err(IngestError::CacheVersion {
            path: path.to_path_buf(),
            found: envelope.format_version,
            max_supported: CACHE_FORMAT_VERSION,
        });
    }
    let actual = payload_digest(&envelope.value_sets, path)?;
    if actual != envelope.payload_sha256 {
        return Err(IngestError::CacheChecksum {
            path: path.to_path_buf(),
            expected: envelope.payload_sha256,
            actual,
        });
    }
    info!(
        path = %path.display(),
        source = %envelope.source,
        created_at = %envelope.created_at,
        value_set_count = envelope.value_sets.len(),
        "loaded value sets from cache"
    );
    Ok(Some(envelope.value_sets))
}

/// Write value sets to the cache, replacing any previous file.
///
/// Uses a temp file and rename so an interrupted write never leaves a
/// half-written cache behind.
pub fn save_cache(path: &Path, source: &str, value_sets: &[RawValueSet]) -> Result<()> {
    let envelope = CacheEnvelope {
        format_version: CACHE_FORMAT_VERSION,
        source: source.to_string(),
        created_at: Utc::now(),
        payload_sha256: payload_digest(value_sets, path)?,
        value_sets: value_sets.to_vec(),
    };
    let bytes = serde_json::to_vec(&envelope).map_err(|source| IngestError::CacheEncode {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let temp_path = path.with_extension("json.tmp");
    let write_err = |source| IngestError::FileWrite {
        path: temp_path.clone(),
        source,
    };
    let mut file = File::create(&temp_path).map_err(write_err)?;
    file.write_all(&bytes).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    fs::rename(&temp_path, path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        value_set_count = value_sets.len(),
        "saved value sets to cache"
    );
    Ok(())
}

fn payload_digest(value_sets: &[RawValueSet], path: &Path) -> Result<String> {
    let payload = serde_json::to_vec(value_sets).map_err(|source| IngestError::CacheEncode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(hex::encode(Sha256::digest(&payload)))
}
