//! Output of export tables.
//!
//! - [`TableRow`]: a serializable row type with a fixed column list
//! - [`TableSink`]: destination for finished tables
//! - [`DelimitedWriter`]: sink writing one delimited file per table
//! - [`output_dir`]: dated directory layout for an export run

mod error;
mod paths;
mod writer;

pub use error::{OutputError, Result};
pub use paths::{DEFAULT_SOURCE_NAME, OUTPUT_NAME, extension_for, output_dir};
pub use writer::{DelimitedWriter, TableRow, TableSink, WrittenTable, write_rows};
