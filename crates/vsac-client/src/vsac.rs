//! UTS ticket authentication and VSAC SVS retrieval.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;
use tracing::debug;

use vsac_model::RawValueSet;

use crate::client::{TerminologyClient, Ticket};
use crate::error::{ClientError, Result};
use crate::svs::parse_value_sets;

/// Endpoint that exchanges an API key for a ticket-granting ticket.
pub const DEFAULT_AUTH_URL: &str = "https://utslogin.nlm.nih.gov/cas/v1/api-key";

/// SVS endpoint for value set retrieval.
pub const DEFAULT_SVS_URL: &str = "https://vsac.nlm.nih.gov/vsac/svs/RetrieveMultipleValueSets";

/// Service name service tickets are issued for.
pub const TICKET_SERVICE: &str = "http://umlsks.nlm.nih.gov";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the VSAC SVS API.
pub struct VsacClient {
    client: Client,
    api_key: String,
    auth_url: String,
    svs_url: String,
}

impl VsacClient {
    /// Create a client for the public endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiKey`] for an empty key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoints(api_key, DEFAULT_AUTH_URL, DEFAULT_SVS_URL)
    }

    /// Create a client against custom endpoints.
    pub fn with_endpoints(
        api_key: impl Into<String>,
        auth_url: impl Into<String>,
        svs_url: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            auth_url: auth_url.into(),
            svs_url: svs_url.into(),
        })
    }

    /// Exchange the ticket-granting ticket for a single-use service ticket.
    fn service_ticket(&self, ticket: &Ticket) -> Result<String> {
        let response = self
            .client
            .post(ticket.as_str())
            .form(&[("service", TICKET_SERVICE)])
            .send()?;
        let body = success_body(ticket.as_str(), response)?;
        let service_ticket = body.trim();
        if service_ticket.is_empty() {
            return Err(ClientError::TicketNotFound);
        }
        Ok(service_ticket.to_string())
    }
}

impl TerminologyClient for VsacClient {
    fn authenticate(&self) -> Result<Ticket> {
        debug!(url = %self.auth_url, "requesting ticket-granting ticket");
        let response = self
            .client
            .post(&self.auth_url)
            .form(&[("apikey", self.api_key.as_str())])
            .send()?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = success_body(&self.auth_url, response)?;
        let url = location
            .or_else(|| form_action(&body))
            .ok_or(ClientError::TicketNotFound)?;
        Ok(Ticket::new(url))
    }

    fn fetch_value_set(&self, oid: &str, ticket: &Ticket) -> Result<RawValueSet> {
        let service_ticket = self.service_ticket(ticket)?;
        debug!(oid = %oid, "retrieving value set");
        let response = self
            .client
            .get(&self.svs_url)
            .query(&[("id", oid), ("ticket", service_ticket.as_str())])
            .send()?;
        let body = success_body(&self.svs_url, response)?;
        parse_value_sets(&body)?
            .into_iter()
            .find(|value_set| value_set.oid == oid)
            .ok_or_else(|| ClientError::ValueSetNotFound {
                oid: oid.to_string(),
            })
    }
}

fn success_body(url: &str, response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(ClientError::Http {
            url: url.to_string(),
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }
    Ok(body)
}

/// The `action` attribute of the first HTML form in a CAS response.
fn form_action(body: &str) -> Option<String> {
    let start = body.find("action=\"")? + "action=\"".len();
    let rest = &body[start..];
    let end = rest.find('"')?;
    let action = rest[..end].trim();
    (!action.is_empty()).then(|| action.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            VsacClient::new("  "),
            Err(ClientError::MissingApiKey)
        ));
    }

    #[test]
    fn extracts_form_action() {
        let body = r#"<html><body><form action="https://utslogin.nlm.nih.gov/cas/v1/api-key/TGT-1-abc-cas" method="POST"></form></body></html>"#;
        assert_eq!(
            form_action(body).as_deref(),
            Some("https://utslogin.nlm.nih.gov/cas/v1/api-key/TGT-1-abc-cas")
        );
        assert_eq!(form_action("<html></html>"), None);
    }

    #[test]
    fn ticket_debug_is_redacted() {
        let ticket = Ticket::new("TGT-secret");
        assert_eq!(format!("{ticket:?}"), "Ticket([REDACTED])");
    }
}
