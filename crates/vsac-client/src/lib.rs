//! Terminology API collaborator.
//!
//! The pipeline only depends on [`TerminologyClient`]; [`VsacClient`] is the
//! production implementation talking to the UTS ticket service and the VSAC
//! SVS endpoint.

pub mod client;
pub mod error;
pub mod sheets;
pub mod svs;
pub mod vsac;

pub use client::{TerminologyClient, Ticket};
pub use error::{ClientError, Result};
pub use sheets::{download_sheet_csv, sheet_export_url};
pub use svs::parse_value_sets;
pub use vsac::VsacClient;
