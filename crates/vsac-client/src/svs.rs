//! Parsing of SVS (Sharing Value Sets) XML responses.
//!
//! Elements are matched on their local name, so the `ns0:` prefix VSAC puts
//! on everything is irrelevant. Both `ValueSet` (`RetrieveValueSet`) and
//! `DescribedValueSet` (`RetrieveMultipleValueSets`) are accepted.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use vsac_model::{Concept, RawValueSet};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Source,
    Purpose,
    Type,
    Status,
    RevisionDate,
}

impl TextField {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"Source" => Some(Self::Source),
            b"Purpose" => Some(Self::Purpose),
            b"Type" => Some(Self::Type),
            b"Status" => Some(Self::Status),
            b"RevisionDate" => Some(Self::RevisionDate),
            _ => None,
        }
    }

    fn assign(self, value_set: &mut RawValueSet, text: &str) {
        let value = Some(text.trim().to_string());
        match self {
            Self::Source => value_set.source = value,
            Self::Purpose => value_set.purpose = value,
            Self::Type => value_set.definition_type = value,
            Self::Status => value_set.status = value,
            Self::RevisionDate => value_set.revision_date = value,
        }
    }
}

fn is_value_set(name: &[u8]) -> bool {
    name == b"ValueSet" || name == b"DescribedValueSet"
}

fn xml_error(err: impl std::fmt::Display) -> ClientError {
    ClientError::Xml(err.to_string())
}

/// Collected attributes of one element, keyed by local name.
fn attributes(reader: &Reader<&[u8]>, element: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(xml_error)?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn take_attr(attrs: &mut Vec<(String, String)>, key: &str) -> Option<String> {
    let idx = attrs.iter().position(|(name, _)| name == key)?;
    Some(attrs.swap_remove(idx).1)
}

fn require_attr(
    attrs: &mut Vec<(String, String)>,
    key: &'static str,
    element: &str,
) -> Result<String> {
    take_attr(attrs, key).ok_or_else(|| {
        ClientError::Xml(format!("{element} element is missing attribute '{key}'"))
    })
}

fn start_value_set(reader: &Reader<&[u8]>, element: &BytesStart<'_>) -> Result<RawValueSet> {
    let mut attrs = attributes(reader, element)?;
    Ok(RawValueSet {
        oid: require_attr(&mut attrs, "ID", "ValueSet")?,
        display_name: require_attr(&mut attrs, "displayName", "ValueSet")?,
        version: require_attr(&mut attrs, "version", "ValueSet")?,
        ..RawValueSet::default()
    })
}

fn concept(reader: &Reader<&[u8]>, element: &BytesStart<'_>) -> Result<Concept> {
    let mut attrs = attributes(reader, element)?;
    Ok(Concept {
        code: require_attr(&mut attrs, "code", "Concept")?,
        code_system_name: require_attr(&mut attrs, "codeSystemName", "Concept")?,
        code_system: take_attr(&mut attrs, "codeSystem"),
        code_system_version: take_attr(&mut attrs, "codeSystemVersion"),
        display_name: take_attr(&mut attrs, "displayName"),
    })
}

/// Parse every value set in an SVS response.
///
/// A value set without a `ConceptList` element keeps `concepts: None`.
///
/// # Errors
///
/// Fails on malformed XML or when a value set or concept lacks a required
/// attribute.
pub fn parse_value_sets(xml: &str) -> Result<Vec<RawValueSet>> {
    let mut reader = Reader::from_str(xml);
    let mut value_sets = Vec::new();
    let mut current: Option<RawValueSet> = None;
    let mut field: Option<TextField> = None;
    let mut text = String::new();
    let mut depth = 0usize;
    let mut set_depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(element) => {
                depth += 1;
                let name = element.local_name();
                let name = name.as_ref();
                if is_value_set(name) {
                    current = Some(start_value_set(&reader, &element)?);
                    set_depth = depth;
                } else if let Some(value_set) = current.as_mut() {
                    if name == b"Concept" {
                        value_set
                            .concepts
                            .get_or_insert_with(Vec::new)
                            .push(concept(&reader, &element)?);
                    } else if depth == set_depth + 1 {
                        if name == b"ConceptList" {
                            value_set.concepts.get_or_insert_with(Vec::new);
                        } else if let Some(found) = TextField::from_local_name(name) {
                            field = Some(found);
                            text.clear();
                        }
                    }
                }
            }
            Event::Empty(element) => {
                let name = element.local_name();
                let name = name.as_ref();
                if is_value_set(name) {
                    value_sets.push(start_value_set(&reader, &element)?);
                } else if let Some(value_set) = current.as_mut() {
                    if name == b"Concept" {
                        value_set
                            .concepts
                            .get_or_insert_with(Vec::new)
                            .push(concept(&reader, &element)?);
                    } else if let Some(found) = TextField::from_local_name(name)
                        && depth == set_depth
                    {
                        found.assign(value_set, "");
                    }
                }
            }
            Event::Text(content) => {
                if field.is_some() {
                    text.push_str(&content.decode().map_err(xml_error)?);
                }
            }
            Event::CData(content) => {
                if field.is_some() {
                    text.push_str(&content.decode().map_err(xml_error)?);
                }
            }
            Event::GeneralRef(reference) => {
                if field.is_some() {
                    if let Some(ch) = reference.resolve_char_ref().map_err(xml_error)? {
                        text.push(ch);
                    } else {
                        let entity = reference.decode().map_err(xml_error)?;
                        let resolved = resolve_predefined_entity(&entity).ok_or_else(|| {
                            ClientError::Xml(format!("unknown entity '&{entity};'"))
                        })?;
                        text.push_str(resolved);
                    }
                }
            }
            Event::End(element) => {
                let name = element.local_name();
                let name = name.as_ref();
                if let (Some(found), Some(value_set)) = (field, current.as_mut())
                    && depth == set_depth + 1
                    && TextField::from_local_name(name) == Some(found)
                {
                    found.assign(value_set, &text);
                    field = None;
                }
                if is_value_set(name)
                    && depth == set_depth
                    && let Some(value_set) = current.take()
                {
                    value_sets.push(value_set);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(ClientError::Xml("unterminated value set element".to_string()));
    }
    Ok(value_sets)
}
