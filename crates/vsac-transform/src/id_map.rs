//! Persistent mapping from value set oid to surrogate `internal_id`.
//!
//! The map is a CSV file shared by every run. Ids once written are never
//! reassigned; unseen oids get `max + 1`, `max + 2`, ... in the order they
//! are first encountered. Rows without an oid (other code set sources) are
//! kept verbatim and count towards the maximum.
//!
//! The file is read, extended and rewritten without locking, so two runs
//! against the same map must not overlap.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;
use vsac_model::ValueSet;

use crate::error::{Result, TransformError};

/// Column order of the identifier map file.
pub const ID_MAP_COLUMNS: [&str; 8] = [
    "source_id_field",
    "oid",
    "ccsr_code",
    "internal_id",
    "internal_source",
    "cset_source",
    "grouped_by_bids",
    "concept_id",
];

/// One row of the identifier map, cells kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdMapRow {
    pub source_id_field: String,
    pub oid: String,
    pub ccsr_code: String,
    pub internal_id: String,
    pub internal_source: String,
    pub cset_source: String,
    pub grouped_by_bids: String,
    pub concept_id: String,
}

/// The identifier map file contents.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    rows: Vec<IdMapRow>,
    ids: BTreeMap<String, u64>,
    max_id: u64,
}

impl IdentifierMap {
    /// Read the map from `path`.
    ///
    /// # Errors
    ///
    /// The file must exist, carry every column in [`ID_MAP_COLUMNS`], have an
    /// integer `internal_id` on each oid row, and map each oid once.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(TransformError::IdMapNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|source| TransformError::IdMapIo {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_reader(file, path)?;
        info!(
            path = %path.display(),
            rows = map.rows.len(),
            mapped_oids = map.ids.len(),
            max_internal_id = map.max_id,
            "loaded identifier map"
        );
        Ok(map)
    }

    /// Parse a map from any reader; `path` is used in errors only.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self> {
        let csv_err = |source| TransformError::IdMapCsv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers: csv::StringRecord = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|header| header.trim().trim_start_matches('\u{feff}'))
            .collect();
        reader.set_headers(headers.clone());
        for column in ID_MAP_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(TransformError::IdMapMissingColumn {
                    path: path.to_path_buf(),
                    column,
                });
            }
        }

        let mut map = Self::default();
        for record in reader.deserialize::<IdMapRow>() {
            let row = record.map_err(csv_err)?;
            let line = map.rows.len() as u64 + 2;
            let internal_id = row.internal_id.trim();
            if row.oid.trim().is_empty() && internal_id.is_empty() {
                map.rows.push(row);
                continue;
            }
            let id = parse_internal_id(internal_id).ok_or_else(|| {
                TransformError::InvalidInternalId {
                    path: path.to_path_buf(),
                    line,
                    value: row.internal_id.clone(),
                }
            })?;
            map.max_id = map.max_id.max(id);
            let oid = row.oid.trim();
            if !oid.is_empty() && map.ids.insert(oid.to_string(), id).is_some() {
                return Err(TransformError::DuplicateOid {
                    path: path.to_path_buf(),
                    oid: oid.to_string(),
                });
            }
            map.rows.push(row);
        }
        Ok(map)
    }

    pub fn get(&self, oid: &str) -> Option<u64> {
        self.ids.get(oid).copied()
    }

    pub fn contains(&self, oid: &str) -> bool {
        self.ids.contains_key(oid)
    }

    /// Number of mapped oids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn rows(&self) -> &[IdMapRow] {
        &self.rows
    }

    /// Largest `internal_id` in the file, 0 when there is none.
    pub fn max_id(&self) -> u64 {
        self.max_id
    }

    /// Assign ids to every oid not yet mapped, in iteration order.
    ///
    /// Returns the new `(oid, internal_id)` pairs.
    pub fn assign_missing<'a, I>(&mut self, oids: I, internal_source: &str) -> Vec<(String, u64)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut assigned = Vec::new();
        for oid in oids {
            if oid.is_empty() || self.ids.contains_key(oid) {
                continue;
            }
            self.max_id += 1;
            let id = self.max_id;
            self.ids.insert(oid.to_string(), id);
            self.rows.push(IdMapRow {
                source_id_field: "oid".to_string(),
                oid: oid.to_string(),
                internal_id: id.to_string(),
                internal_source: internal_source.to_string(),
                cset_source: "VSAC".to_string(),
                ..IdMapRow::default()
            });
            assigned.push((oid.to_string(), id));
        }
        assigned
    }

    /// Rewrite the file at `path` through a temp file and rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        let temp_path = temp_path(path);
        let mut file = File::create(&temp_path).map_err(io_err(&temp_path))?;
        self.write_to(&mut file)
            .map_err(|source| TransformError::IdMapCsv {
                path: temp_path.clone(),
                source,
            })?;
        file.sync_all().map_err(io_err(&temp_path))?;
        fs::rename(&temp_path, path).map_err(io_err(path))?;
        info!(path = %path.display(), rows = self.rows.len(), "saved identifier map");
        Ok(())
    }

    /// Serialize all rows with the header.
    pub fn write_to<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        writer.write_record(ID_MAP_COLUMNS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Snapshot of the current oid to id mapping.
    pub fn lookup(&self) -> IdentifierLookup {
        IdentifierLookup {
            ids: self.ids.clone(),
            assigned: Vec::new(),
        }
    }
}

/// oid to `internal_id` lookup used by the table builders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierLookup {
    ids: BTreeMap<String, u64>,
    assigned: Vec<(String, u64)>,
}

impl IdentifierLookup {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            ids: pairs.into_iter().map(|(oid, id)| (oid.into(), id)).collect(),
            assigned: Vec::new(),
        }
    }

    pub fn get(&self, oid: &str) -> Option<u64> {
        self.ids.get(oid).copied()
    }

    /// The id for `oid`, or [`TransformError::UnknownOid`].
    pub fn codeset_id(&self, oid: &str) -> Result<u64> {
        self.get(oid).ok_or_else(|| TransformError::UnknownOid {
            oid: oid.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids created by the run that produced this lookup.
    pub fn newly_assigned(&self) -> &[(String, u64)] {
        &self.assigned
    }
}

/// Load the map, assign ids to unseen oids, persist, and return the lookup.
///
/// The file is only rewritten when at least one id was assigned.
pub fn resolve_identifiers(
    path: &Path,
    value_sets: &[ValueSet],
    internal_source: &str,
) -> Result<IdentifierLookup> {
    let mut map = IdentifierMap::load(path)?;
    let assigned = map.assign_missing(
        value_sets.iter().map(|value_set| value_set.oid.as_str()),
        internal_source,
    );
    if !assigned.is_empty() {
        info!(new_ids = assigned.len(), "assigned surrogate ids to unseen oids");
        map.save(path)?;
    }
    let mut lookup = map.lookup();
    lookup.assigned = assigned;
    Ok(lookup)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> TransformError + use<> {
    let path = path.to_path_buf();
    move |source| TransformError::IdMapIo { path, source }
}

/// Accepts `12` and float renderings such as `12.0`.
fn parse_internal_id(value: &str) -> Option<u64> {
    if let Ok(id) = value.parse::<u64>() {
        return Some(id);
    }
    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
