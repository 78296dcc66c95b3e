//! Domain types used throughout the import.
//!
//! This module defines:
//!
//! - the parsed export row (`DonationRow`)
//! - label axes and deployment modes (`LabelAxis`, `ScopeMode`)
//! - the resolved run configuration (`ImportConfig`)

pub mod types;

pub use types::*;
