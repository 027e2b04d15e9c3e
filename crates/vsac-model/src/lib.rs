//! Data model for VSAC value sets and the exports derived from them.

pub mod error;
pub mod export;
pub mod purpose;
pub mod source;
pub mod value_set;

pub use error::{ModelError, PurposeFormatError, Result};
pub use export::{ExportPlan, OutputFormat, OutputStructure};
pub use purpose::Purpose;
pub use source::InputSourceType;
pub use value_set::{Concept, RawValueSet, ValueSet, last_oid_segment};
