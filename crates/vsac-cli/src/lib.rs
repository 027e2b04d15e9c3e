//! Library components of the `vsac-wrangler` binary.

pub mod logging;
pub mod pipeline;
pub mod types;
