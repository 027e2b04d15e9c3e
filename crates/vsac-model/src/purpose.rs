//! Parsing of the VSAC purpose statement.
//!
//! VSAC packs four sub-fields into one free-text purpose string:
//!
//! ```text
//! (Clinical Focus: ...),(Data Element Scope: ...),(Inclusion Criteria: ...),(Exclusion Criteria: ...)
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PurposeFormatError;

/// Separator between sub-fields in the raw purpose string.
const SUBFIELD_SEPARATOR: &str = "),";

/// Labels VSAC prefixes each sub-field with, in order.
pub const SUBFIELD_LABELS: [&str; 4] = [
    "Clinical Focus",
    "Data Element Scope",
    "Inclusion Criteria",
    "Exclusion Criteria",
];

/// The four sub-fields of a value set purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purpose {
    pub clinical_focus: String,
    pub data_element_scope: String,
    pub inclusion_criteria: String,
    pub exclusion_criteria: String,
}

impl Purpose {
    /// Split a raw purpose string into its sub-fields.
    ///
    /// Each part loses its leading `(` and its label prefix when present.
    /// The closing `)` of the first three parts is consumed by the split, so
    /// only the last part has one stripped.
    pub fn parse(text: &str) -> Result<Self, PurposeFormatError> {
        let parts: Vec<&str> = text.split(SUBFIELD_SEPARATOR).collect();
        let &[focus, scope, inclusion, exclusion] = parts.as_slice() else {
            return Err(PurposeFormatError { found: parts.len() });
        };
        Ok(Self {
            clinical_focus: clean_subfield(focus, SUBFIELD_LABELS[0]),
            data_element_scope: clean_subfield(scope, SUBFIELD_LABELS[1]),
            inclusion_criteria: clean_subfield(inclusion, SUBFIELD_LABELS[2]),
            exclusion_criteria: clean_subfield(
                exclusion.strip_suffix(')').unwrap_or(exclusion),
                SUBFIELD_LABELS[3],
            ),
        })
    }

    /// Focus, scope and inclusion criteria joined by `"; "`.
    pub fn intention(&self) -> String {
        [
            self.clinical_focus.as_str(),
            self.data_element_scope.as_str(),
            self.inclusion_criteria.as_str(),
        ]
        .join("; ")
    }

    /// The exclusion criteria.
    pub fn limitations(&self) -> &str {
        &self.exclusion_criteria
    }
}

impl FromStr for Purpose {
    type Err = PurposeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn clean_subfield(raw: &str, label: &str) -> String {
    let inner = raw.strip_prefix('(').unwrap_or(raw);
    match inner
        .strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(':'))
    {
        Some(rest) => rest.trim_start().to_string(),
        None => inner.to_string(),
    }
}
