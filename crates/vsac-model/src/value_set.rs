//! Value set records as returned by VSAC and after normalization.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::purpose::Purpose;

/// A single code within a value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub code: String,
    pub code_system_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_system_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Concept {
    pub fn new(code: impl Into<String>, code_system_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            code_system_name: code_system_name.into(),
            code_system: None,
            code_system_version: None,
            display_name: None,
        }
    }
}

/// A value set exactly as VSAC described it.
///
/// Element fields are optional because the service omits them freely;
/// `concepts` is `None` when the response carried no concept list at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawValueSet {
    pub oid: String,
    pub display_name: String,
    pub version: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub definition_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub revision_date: Option<String>,
    #[serde(default)]
    pub concepts: Option<Vec<Concept>>,
}

impl RawValueSet {
    /// True when VSAC returned no concepts for this value set.
    pub fn is_empty(&self) -> bool {
        self.concepts.as_ref().is_none_or(Vec::is_empty)
    }
}

/// A value set with every field the exports rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSet {
    pub oid: String,
    pub display_name: String,
    pub version: String,
    /// Steward organisation (`Source` element).
    pub steward: String,
    pub purpose: Purpose,
    /// Definition type (`Type` element), e.g. `Extensional`.
    pub definition_type: String,
    pub status: Option<String>,
    pub revision_date: Option<String>,
    pub concepts: Vec<Concept>,
}

impl ValueSet {
    /// Validate a raw record.
    ///
    /// # Errors
    ///
    /// Fails when a required element is absent, the purpose does not have
    /// four sub-fields, or there are no concepts.
    pub fn from_raw(raw: RawValueSet) -> Result<Self> {
        let RawValueSet {
            oid,
            display_name,
            version,
            source,
            purpose,
            definition_type,
            status,
            revision_date,
            concepts,
        } = raw;
        let Some(steward) = source else {
            return Err(ModelError::MissingField { oid, field: "Source" });
        };
        let Some(purpose_text) = purpose else {
            return Err(ModelError::MissingField {
                oid,
                field: "Purpose",
            });
        };
        let Some(definition_type) = definition_type else {
            return Err(ModelError::MissingField { oid, field: "Type" });
        };
        let purpose = match Purpose::parse(&purpose_text) {
            Ok(purpose) => purpose,
            Err(source) => return Err(ModelError::Purpose { oid, source }),
        };
        let concepts = match concepts {
            Some(concepts) if !concepts.is_empty() => concepts,
            _ => return Err(ModelError::NoConcepts { oid }),
        };
        Ok(Self {
            oid,
            display_name,
            version,
            steward,
            purpose,
            definition_type,
            status,
            revision_date,
            concepts,
        })
    }

    /// Distinct code system names in first-seen order.
    pub fn code_systems(&self) -> Vec<&str> {
        let mut systems: Vec<&str> = Vec::new();
        for concept in &self.concepts {
            if !systems.contains(&concept.code_system_name.as_str()) {
                systems.push(&concept.code_system_name);
            }
        }
        systems
    }
}

/// The last dot-delimited segment of an oid.
pub fn last_oid_segment(oid: &str) -> &str {
    oid.rsplit('.').next().unwrap_or(oid)
}
