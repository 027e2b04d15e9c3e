//! Error types for the terminology client.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    /// No API key was configured.
    #[error("no VSAC API key configured (set VSAC_API_KEY or pass --api-key)")]
    MissingApiKey,

    /// The authentication response did not contain a ticket URL.
    #[error("authentication response did not contain a ticket-granting ticket")]
    TicketNotFound,

    /// The SVS response could not be parsed.
    #[error("malformed SVS response: {0}")]
    Xml(String),

    /// The SVS response contained no value set for the requested oid.
    #[error("VSAC returned no value set for {oid}")]
    ValueSetNotFound { oid: String },

    /// The spreadsheet URL does not point at a Google Sheet.
    #[error("not a Google Sheets URL: {0}")]
    InvalidSheetUrl(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
