use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Where the list of value set identifiers comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSourceType {
    /// A Google Sheet, downloaded through its CSV export.
    GoogleSheet,
    /// Newline-delimited text file.
    Txt,
    /// Delimited file with an `oid` or `OID` column.
    Csv,
}

impl InputSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleSheet => "google-sheet",
            Self::Txt => "txt",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for InputSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputSourceType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google-sheet" => Ok(Self::GoogleSheet),
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            _ => Err(ModelError::UnknownVariant {
                kind: "input source type",
                value: s.to_string(),
            }),
        }
    }
}
