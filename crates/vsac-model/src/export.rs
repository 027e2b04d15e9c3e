//! Output format and structure selection.
//!
//! Only one combination produces output today. Every other pair is rejected
//! up front so that an unsupported request never leaves partial files behind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// File format of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Delimited tables (`tabular/csv`).
    TabularCsv,
    /// One JSON document per value set.
    Json,
}

impl OutputFormat {
    pub const ALL: [Self; 2] = [Self::TabularCsv, Self::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TabularCsv => "tabular/csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tabular/csv" | "csv" | "tabular" => Ok(Self::TabularCsv),
            "json" => Ok(Self::Json),
            _ => Err(ModelError::UnknownVariant {
                kind: "output format",
                value: s.to_string(),
            }),
        }
    }
}

/// Shape of the exported records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputStructure {
    Fhir,
    Vsac,
    PalantirConceptSetTables,
    Atlas,
    Normalized,
}

impl OutputStructure {
    pub const ALL: [Self; 5] = [
        Self::Fhir,
        Self::Vsac,
        Self::PalantirConceptSetTables,
        Self::Atlas,
        Self::Normalized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fhir => "fhir",
            Self::Vsac => "vsac",
            Self::PalantirConceptSetTables => "palantir-concept-set-tables",
            Self::Atlas => "atlas",
            Self::Normalized => "normalized",
        }
    }
}

impl fmt::Display for OutputStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputStructure {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|structure| structure.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "output structure",
                value: s.to_string(),
            })
    }
}

/// A supported export, resolved from a format and structure pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPlan {
    /// The three enclave concept set tables written as delimited files.
    PalantirConceptSetTables,
}

impl ExportPlan {
    /// Resolve a requested format and structure.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedExport`] for every pair without an
    /// implementation.
    pub fn resolve(format: OutputFormat, structure: OutputStructure) -> Result<Self, ModelError> {
        match (format, structure) {
            (OutputFormat::TabularCsv, OutputStructure::PalantirConceptSetTables) => {
                Ok(Self::PalantirConceptSetTables)
            }
            (
                OutputFormat::TabularCsv,
                OutputStructure::Fhir
                | OutputStructure::Vsac
                | OutputStructure::Atlas
                | OutputStructure::Normalized,
            )
            | (
                OutputFormat::Json,
                OutputStructure::Fhir
                | OutputStructure::Vsac
                | OutputStructure::PalantirConceptSetTables
                | OutputStructure::Atlas
                | OutputStructure::Normalized,
            ) => Err(ModelError::UnsupportedExport { format, structure }),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        match self {
            Self::PalantirConceptSetTables => OutputFormat::TabularCsv,
        }
    }

    pub fn output_structure(&self) -> OutputStructure {
        match self {
            Self::PalantirConceptSetTables => OutputStructure::PalantirConceptSetTables,
        }
    }
}
