use std::path::PathBuf;

use chrono::NaiveDate;
use vsac_model::{InputSourceType, OutputFormat, OutputStructure};
use vsac_output::WrittenTable;
use vsac_transform::{DroppedValueSet, RenamedValueSet, TableOptions};

/// Where the value set identifiers of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub source_type: InputSourceType,
    /// File path, or sheet URL for `google-sheet`.
    pub location: String,
    /// Human name of the sheet, used for the cache key when present.
    pub sheet_name: Option<String>,
}

impl InputSource {
    pub fn file(source_type: InputSourceType, path: impl Into<String>) -> Self {
        Self {
            source_type,
            location: path.into(),
            sheet_name: None,
        }
    }

    /// Name the run cache is keyed by.
    pub fn cache_name(&self) -> &str {
        self.sheet_name.as_deref().unwrap_or(&self.location)
    }
}

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: InputSource,
    pub output_format: OutputFormat,
    pub output_structure: OutputStructure,
    pub field_delimiter: u8,
    pub use_cache: bool,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub id_map_path: PathBuf,
    /// Directory level under the output profile, `vsac` by default.
    pub source_name: String,
    /// Date component of the output directory.
    pub output_date: NaiveDate,
    pub table_options: TableOptions,
    pub show_progress: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_format: OutputFormat,
    pub output_structure: OutputStructure,
    pub source: String,
    pub from_cache: bool,
    pub cache_path: PathBuf,
    /// Identifiers read from the input; 0 on a cache hit.
    pub requested: usize,
    /// Raw value sets fetched or loaded.
    pub retrieved: usize,
    pub exported: usize,
    pub dropped: Vec<DroppedValueSet>,
    pub renamed: Vec<RenamedValueSet>,
    pub new_ids: Vec<(String, u64)>,
    pub output_dir: PathBuf,
    pub tables: Vec<WrittenTable>,
}
