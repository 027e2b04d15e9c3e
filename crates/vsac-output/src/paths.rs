//! Export directory layout.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Output profile directory for the three-table export.
pub const OUTPUT_NAME: &str = "palantir-three-file";

/// Source directory used when the caller does not name one.
pub const DEFAULT_SOURCE_NAME: &str = "vsac";

/// `<data_dir>/<output_name>/<source_name>/<YYYY.MM.DD>/output`
pub fn output_dir(data_dir: &Path, output_name: &str, source_name: &str, date: NaiveDate) -> PathBuf {
    data_dir
        .join(output_name)
        .join(source_name)
        .join(date.format("%Y.%m.%d").to_string())
        .join("output")
}

/// File extension for a field delimiter.
pub fn extension_for(delimiter: u8) -> &'static str {
    match delimiter {
        b',' => "csv",
        b'\t' => "tsv",
        _ => "txt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_layout() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 5).unwrap();
        let dir = output_dir(Path::new("data"), OUTPUT_NAME, DEFAULT_SOURCE_NAME, date);
        assert_eq!(
            dir,
            Path::new("data/palantir-three-file/vsac/2022.01.05/output")
        );
    }

    #[test]
    fn extensions() {
        assert_eq!(extension_for(b','), "csv");
        assert_eq!(extension_for(b'\t'), "tsv");
        assert_eq!(extension_for(b';'), "txt");
    }
}
