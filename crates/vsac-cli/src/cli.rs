//! CLI argument definitions for vsac-wrangler.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use vsac_model::{InputSourceType, OutputFormat, OutputStructure};

#[derive(Parser)]
#[command(
    name = "vsac-wrangler",
    version,
    about = "Export VSAC value sets as enclave concept set tables",
    long_about = "Fetch value sets from the VSAC SVS API and export them as the three\n\
                  concept set import tables (item, code set, container).\n\n\
                  Value set oids come from a text file, a CSV file, or a Google Sheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch value sets and write the export tables.
    Run(RunArgs),

    /// List output format and structure combinations.
    Plans,
}

#[derive(Args)]
pub struct RunArgs {
    /// Where the value set oids come from.
    #[arg(
        short = 's',
        long = "input-source-type",
        value_enum,
        default_value = "csv"
    )]
    pub input_source_type: InputSourceArg,

    /// Path of the txt or csv oid list.
    #[arg(
        short = 'p',
        long = "input-path",
        value_name = "PATH",
        required_if_eq_any = [("input_source_type", "txt"), ("input_source_type", "csv")]
    )]
    pub input_path: Option<PathBuf>,

    /// URL of the Google Sheet listing the oids.
    #[arg(
        long = "google-sheet-url",
        value_name = "URL",
        required_if_eq("input_source_type", "google-sheet")
    )]
    pub google_sheet_url: Option<String>,

    /// Name of the sheet, used to key the run cache.
    #[arg(long = "google-sheet-name", value_name = "NAME")]
    pub google_sheet_name: Option<String>,

    /// Output file format (tabular/csv or json).
    #[arg(long = "output-format", default_value = "tabular/csv")]
    pub output_format: OutputFormat,

    /// Output structure (fhir, vsac, palantir-concept-set-tables, atlas, normalized).
    #[arg(long = "output-structure", default_value = "palantir-concept-set-tables")]
    pub output_structure: OutputStructure,

    /// Field delimiter for tabular output (a single character, or "tab").
    #[arg(long = "field-delimiter", default_value = ",", value_parser = parse_delimiter)]
    pub field_delimiter: u8,

    /// Reuse the value sets saved by the previous run of the same input.
    #[arg(short = 'c', long = "use-cache")]
    pub use_cache: bool,

    /// Data directory (default: $VSAC_WRANGLER_DATA_DIR or ./data).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Cache directory (default: $VSAC_WRANGLER_CACHE_DIR or <DATA_DIR>/cache).
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Identifier map CSV (default: <DATA_DIR>/cset.csv).
    #[arg(long = "id-map", value_name = "PATH")]
    pub id_map: Option<PathBuf>,

    /// Source directory name under the output profile.
    #[arg(long = "source-name", default_value = vsac_output::DEFAULT_SOURCE_NAME)]
    pub source_name: String,

    /// UTS API key.
    #[arg(long = "api-key", env = "VSAC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Hide the fetch progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// CLI input source choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum InputSourceArg {
    GoogleSheet,
    Txt,
    Csv,
}

impl From<InputSourceArg> for InputSourceType {
    fn from(arg: InputSourceArg) -> Self {
        match arg {
            InputSourceArg::GoogleSheet => Self::GoogleSheet,
            InputSourceArg::Txt => Self::Txt,
            InputSourceArg::Csv => Self::Csv,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "delimiter must be a single ASCII character, got '{value}'"
            )),
        },
    }
}
