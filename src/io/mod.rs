//! Input/output helpers.
//!
//! - export CSV loading (`ingest`)
//! - scope names from export filenames (`naming`)
//! - PII removal for exports (`sanitize`)

pub mod ingest;
pub mod naming;
pub mod sanitize;

pub use ingest::*;
pub use naming::*;
pub use sanitize::*;
