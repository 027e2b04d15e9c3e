//! Reading value set identifiers from the supported input sources.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Column that marks rows to leave out of a run.
pub const DO_NOT_LOAD_COLUMN: &str = "DoNotLoad";

/// Which spelling of the identifier column to look for first.
///
/// Sheets were migrated to `OID` while older CSV exports still carry `oid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPreference {
    LowerFirst,
    UpperFirst,
}

impl ColumnPreference {
    fn candidates(self) -> [&'static str; 2] {
        match self {
            Self::LowerFirst => ["oid", "OID"],
            Self::UpperFirst => ["OID", "oid"],
        }
    }
}

/// Identifiers read from an input source, deduplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OidList {
    pub oids: Vec<String>,
    /// Rows dropped because their `DoNotLoad` flag was set.
    pub skipped_do_not_load: usize,
    /// Identifiers that appeared more than once.
    pub duplicates: usize,
}

impl OidList {
    fn push(&mut self, seen: &mut BTreeSet<String>, oid: &str) {
        let oid = oid.trim();
        if oid.is_empty() {
            return;
        }
        if seen.insert(oid.to_string()) {
            self.oids.push(oid.to_string());
        } else {
            self.duplicates += 1;
            warn!(oid = %oid, "duplicate identifier in input; keeping first occurrence");
        }
    }

    pub fn len(&self) -> usize {
        self.oids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oids.is_empty()
    }
}

/// Resolve an input path, retrying relative to the working directory.
///
/// # Errors
///
/// Returns [`IngestError::FileNotFound`] when neither location is a file.
pub fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let joined = cwd.join(path);
    if joined.is_file() {
        return Ok(joined);
    }
    Err(IngestError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Read a newline-delimited identifier file. Blank lines are skipped.
pub fn read_txt_oids(path: &Path) -> Result<OidList> {
    let path = resolve_input_path(path)?;
    let text = std::fs::read_to_string(&path).map_err(|source| IngestError::FileRead {
        path: path.clone(),
        source,
    })?;
    let mut list = OidList::default();
    let mut seen = BTreeSet::new();
    for line in text.lines() {
        list.push(&mut seen, line.trim_start_matches('\u{feff}'));
    }
    debug!(path = %path.display(), oid_count = list.len(), "read identifiers from text file");
    Ok(list)
}

/// Read identifiers from a CSV file with an `oid` (or `OID`) column.
pub fn read_csv_oids(path: &Path) -> Result<OidList> {
    let path = resolve_input_path(path)?;
    let file = File::open(&path).map_err(|source| IngestError::FileRead {
        path: path.clone(),
        source,
    })?;
    let list = read_oid_table(
        file,
        &path.display().to_string(),
        ColumnPreference::LowerFirst,
    )?;
    debug!(path = %path.display(), oid_count = list.len(), "read identifiers from csv file");
    Ok(list)
}

/// Parse the CSV export of a spreadsheet (`OID` preferred over `oid`).
pub fn parse_sheet_csv(text: &str, source_name: &str) -> Result<OidList> {
    read_oid_table(text.as_bytes(), source_name, ColumnPreference::UpperFirst)
}

/// Read identifiers from any delimited table.
///
/// Rows whose `DoNotLoad` cell is truthy are skipped.
///
/// # Errors
///
/// Fails on malformed CSV or when no identifier column exists.
pub fn read_oid_table<R: Read>(
    reader: R,
    source_name: &str,
    preference: ColumnPreference,
) -> Result<OidList> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::CsvParse {
            source_name: source_name.to_string(),
            source,
        })?
        .iter()
        .map(normalize_header)
        .collect();

    let candidates = preference.candidates();
    let oid_index = candidates
        .iter()
        .find_map(|name| headers.iter().position(|header| header == name))
        .ok_or_else(|| IngestError::MissingColumn {
            expected: candidates.to_vec(),
            source_name: source_name.to_string(),
        })?;
    let skip_index = headers
        .iter()
        .position(|header| header == DO_NOT_LOAD_COLUMN);

    let mut list = OidList::default();
    let mut seen = BTreeSet::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            source_name: source_name.to_string(),
            source,
        })?;
        if let Some(idx) = skip_index
            && is_truthy(record.get(idx).unwrap_or(""))
        {
            list.skipped_do_not_load += 1;
            continue;
        }
        list.push(&mut seen, record.get(oid_index).unwrap_or(""));
    }
    Ok(list)
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
