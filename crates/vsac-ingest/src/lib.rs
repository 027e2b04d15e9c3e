//! Inputs of a VSAC wrangling run.
//!
//! - identifier lists from text, CSV, or downloaded sheet exports
//! - the run cache of raw value sets
//! - default data and cache directories

pub mod cache;
pub mod error;
pub mod oids;
pub mod paths;

pub use cache::{CACHE_FORMAT_VERSION, cache_file_name, cache_path, load_cache, save_cache};
pub use error::{IngestError, Result};
pub use oids::{
    ColumnPreference, OidList, parse_sheet_csv, read_csv_oids, read_oid_table, read_txt_oids,
    resolve_input_path,
};
pub use paths::{IDENTIFIER_MAP_FILE, cache_dir, data_dir, identifier_map_path};
