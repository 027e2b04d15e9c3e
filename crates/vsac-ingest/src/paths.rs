//! Data directory resolution.

use std::path::PathBuf;

/// Environment variable for overriding the data directory.
pub const DATA_DIR_ENV_VAR: &str = "VSAC_WRANGLER_DATA_DIR";

/// Environment variable for overriding the cache directory.
pub const CACHE_DIR_ENV_VAR: &str = "VSAC_WRANGLER_CACHE_DIR";

/// File name of the persisted oid to internal id map.
pub const IDENTIFIER_MAP_FILE: &str = "cset.csv";

/// Get the data directory.
///
/// Resolution order:
/// 1. `VSAC_WRANGLER_DATA_DIR` environment variable
/// 2. `data/` relative to the working directory
pub fn data_dir() -> PathBuf {
    if let Ok(root) = std::env::var(DATA_DIR_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from("data")
}

/// Get the cache directory (`VSAC_WRANGLER_CACHE_DIR` or `<data>/cache`).
pub fn cache_dir() -> PathBuf {
    if let Ok(root) = std::env::var(CACHE_DIR_ENV_VAR) {
        return PathBuf::from(root);
    }
    data_dir().join("cache")
}

/// Default location of the identifier map.
pub fn identifier_map_path() -> PathBuf {
    data_dir().join(IDENTIFIER_MAP_FILE)
}
