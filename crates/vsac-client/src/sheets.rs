//! Download of Google Sheets as CSV.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{ClientError, Result};

const SHEETS_PREFIX: &str = "https://docs.google.com/spreadsheets/d/";

/// Build the CSV export URL for a sheet URL or bare document id.
///
/// A `gid` in the given URL selects the tab.
///
/// # Errors
///
/// Returns [`ClientError::InvalidSheetUrl`] when no document id is present.
pub fn sheet_export_url(sheet: &str) -> Result<String> {
    let sheet = sheet.trim();
    let id = match sheet.strip_prefix(SHEETS_PREFIX) {
        Some(rest) => rest.split(['/', '?', '#']).next().unwrap_or(""),
        None if sheet.contains("://") || sheet.contains('/') => "",
        None => sheet,
    };
    if id.is_empty() {
        return Err(ClientError::InvalidSheetUrl(sheet.to_string()));
    }
    let gid = sheet
        .split(['?', '#', '&'])
        .find_map(|part| part.strip_prefix("gid="))
        .filter(|gid| !gid.is_empty() && gid.chars().all(|ch| ch.is_ascii_digit()));
    Ok(match gid {
        Some(gid) => format!("{SHEETS_PREFIX}{id}/export?format=csv&gid={gid}"),
        None => format!("{SHEETS_PREFIX}{id}/export?format=csv"),
    })
}

/// Fetch the CSV export of a publicly readable sheet.
pub fn download_sheet_csv(sheet: &str) -> Result<String> {
    let url = sheet_export_url(sheet)?;
    debug!(url = %url, "downloading sheet");
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let response = client.get(&url).send()?;
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(ClientError::Http {
            url,
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }
    Ok(body)
}
