//! Delimited table writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::error::{OutputError, Result};
use crate::paths::extension_for;

/// A row of an export table.
///
/// `COLUMNS` must list the serialized field names in declaration order. The
/// header is written from it so that an empty table still has one.
pub trait TableRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

/// Destination for finished tables.
pub trait TableSink {
    /// Persist one table under `name` (no extension).
    fn write_table<R: TableRow>(&mut self, name: &str, rows: &[R]) -> Result<()>;
}

/// A table written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes each table to `<dir>/<name>.<ext>`.
#[derive(Debug)]
pub struct DelimitedWriter {
    dir: PathBuf,
    delimiter: u8,
    written: Vec<WrittenTable>,
}

impl DelimitedWriter {
    pub fn new(dir: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            dir: dir.into(),
            delimiter,
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a table with this name is written to.
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{name}.{}", extension_for(self.delimiter)))
    }

    /// Tables written so far, in write order.
    pub fn written(&self) -> &[WrittenTable] {
        &self.written
    }

    pub fn into_written(self) -> Vec<WrittenTable> {
        self.written
    }
}

impl TableSink for DelimitedWriter {
    fn write_table<R: TableRow>(&mut self, name: &str, rows: &[R]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| OutputError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.table_path(name);
        let file = File::create(&path).map_err(|source| OutputError::Io {
            path: path.clone(),
            source,
        })?;
        write_rows(file, self.delimiter, rows).map_err(|source| OutputError::Csv {
            path: path.clone(),
            source,
        })?;
        info!(table = %name, path = %path.display(), rows = rows.len(), "wrote table");
        self.written.push(WrittenTable {
            name: name.to_string(),
            path,
            rows: rows.len(),
        });
        Ok(())
    }
}

/// Serialize rows with a header line to any writer.
pub fn write_rows<W: Write, R: TableRow>(
    writer: W,
    delimiter: u8,
    rows: &[R],
) -> std::result::Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(R::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
