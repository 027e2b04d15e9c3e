use std::fmt;

use vsac_model::RawValueSet;

use crate::error::Result;

/// A ticket-granting ticket issued by the authentication service.
#[derive(Clone, PartialEq, Eq)]
pub struct Ticket(String);

impl Ticket {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ticket([REDACTED])")
    }
}

/// Source of value set records.
pub trait TerminologyClient {
    /// Obtain a ticket for subsequent requests.
    fn authenticate(&self) -> Result<Ticket>;

    /// Retrieve one value set by oid.
    fn fetch_value_set(&self, oid: &str, ticket: &Ticket) -> Result<RawValueSet>;

    /// Retrieve value sets in order, stopping at the first failure.
    ///
    /// `on_fetched` sees each value set as soon as it arrives.
    fn fetch<F>(
        &self,
        oids: &[String],
        ticket: &Ticket,
        mut on_fetched: F,
    ) -> Result<Vec<RawValueSet>>
    where
        F: FnMut(&RawValueSet),
    {
        let mut value_sets = Vec::with_capacity(oids.len());
        for oid in oids {
            let value_set = self.fetch_value_set(oid, ticket)?;
            on_fetched(&value_set);
            value_sets.push(value_set);
        }
        Ok(value_sets)
    }
}
