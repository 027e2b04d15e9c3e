//! Normalization of raw value sets before export.
//!
//! Records without concepts and repeated oids are dropped with a warning.
//! Code system synonyms are removed from display names and the leftover
//! spacing is tidied, then names shared by more than one value set are
//! disambiguated with a suffix taken from the oid. Collisions are judged on
//! the emitted concept set label. Disambiguated value sets come first in the
//! output.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};
use vsac_model::{RawValueSet, ValueSet, last_oid_segment};

use crate::error::Result;
use crate::tables::{concept_set_label, flatten_newlines};

/// Spellings of SNOMED CT that value set names carry, most specific first.
const SNOMED_SYNONYMS: [&str; 5] = ["SNOMEDCT", "SNOMED CT", "SNOMED", "SCT", "SM CT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The service returned no concepts.
    NoConcepts,
    /// An earlier record had the same oid.
    DuplicateOid,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoConcepts => "no concepts",
            Self::DuplicateOid => "duplicate oid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedValueSet {
    pub oid: String,
    pub display_name: String,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedValueSet {
    pub oid: String,
    pub from: String,
    pub to: String,
}

/// Result of normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Value sets ready for export, display names pairwise distinct.
    pub value_sets: Vec<ValueSet>,
    pub dropped: Vec<DroppedValueSet>,
    /// Value sets whose name was changed to resolve a collision.
    pub renamed: Vec<RenamedValueSet>,
}

/// Remove SNOMED CT spellings from a display name.
///
/// Plain substring removal, case-sensitive. For each synonym the
/// parenthesized form is removed before the bare form.
pub fn strip_snomed_synonyms(name: &str) -> String {
    let mut name = name.to_string();
    for synonym in SNOMED_SYNONYMS {
        name = name.replace(&format!("({synonym})"), "");
        name = name.replace(synonym, "");
    }
    name
}

/// Trim a display name and collapse runs of spaces and tabs to one space.
///
/// Line breaks are kept; the table builders flatten them.
pub fn tidy_name(name: &str) -> String {
    name.split([' ', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key two value sets collide on: the label every table emits.
fn label_key(name: &str) -> String {
    flatten_newlines(&concept_set_label(name))
}

/// Validate raw records and make their display names unique.
///
/// # Errors
///
/// Fails when a record with concepts lacks a required field or has a
/// malformed purpose.
pub fn normalize_value_sets(raw: Vec<RawValueSet>) -> Result<NormalizeReport> {
    let mut report = NormalizeReport::default();
    let mut seen_oids = BTreeSet::new();
    let mut valid = Vec::with_capacity(raw.len());

    for record in raw {
        if record.is_empty() {
            warn!(
                oid = %record.oid,
                name = %record.display_name,
                "VSAC returned 0 concepts for value set; it will be skipped"
            );
            report.dropped.push(DroppedValueSet {
                oid: record.oid,
                display_name: record.display_name,
                reason: DropReason::NoConcepts,
            });
            continue;
        }
        if !seen_oids.insert(record.oid.clone()) {
            warn!(oid = %record.oid, "value set returned more than once; keeping first");
            report.dropped.push(DroppedValueSet {
                oid: record.oid,
                display_name: record.display_name,
                reason: DropReason::DuplicateOid,
            });
            continue;
        }
        let mut value_set = ValueSet::from_raw(record)?;
        value_set.display_name = tidy_name(&strip_snomed_synonyms(&value_set.display_name));
        valid.push(value_set);
    }

    let keys: Vec<String> = valid
        .iter()
        .map(|value_set| label_key(&value_set.display_name))
        .collect();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for key in &keys {
        *counts.entry(key.as_str()).or_default() += 1;
    }
    let colliding: Vec<bool> = keys.iter().map(|key| counts[key.as_str()] > 1).collect();
    let mut taken: BTreeSet<String> = keys
        .iter()
        .zip(&colliding)
        .filter(|(_, collides)| !**collides)
        .map(|(key, _)| key.clone())
        .collect();

    let mut disambiguated = Vec::new();
    let mut unique = Vec::new();
    for (mut value_set, collides) in valid.into_iter().zip(colliding) {
        if !collides {
            unique.push(value_set);
            continue;
        }
        let name = disambiguate(&value_set.display_name, &value_set.oid, &taken);
        taken.insert(label_key(&name));
        debug!(oid = %value_set.oid, from = %value_set.display_name, to = %name, "renamed value set");
        report.renamed.push(RenamedValueSet {
            oid: value_set.oid.clone(),
            from: std::mem::replace(&mut value_set.display_name, name.clone()),
            to: name,
        });
        disambiguated.push(value_set);
    }

    report.value_sets = disambiguated;
    report.value_sets.extend(unique);
    Ok(report)
}

fn disambiguate(name: &str, oid: &str, taken: &BTreeSet<String>) -> String {
    let is_free = |candidate: &String| !taken.contains(&label_key(candidate));
    let short = tidy_name(&format!("{name} {}", last_oid_segment(oid)));
    if is_free(&short) {
        return short;
    }
    let full = tidy_name(&format!("{name} {oid}"));
    if is_free(&full) {
        return full;
    }
    (2u64..)
        .map(|n| format!("{full} ({n})"))
        .find(is_free)
        .unwrap_or(full)
}
