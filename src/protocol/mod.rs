//! Line-protocol rendering for the store's bulk CSV import.
//!
//! - field-tag schemas (`schema`)
//! - rendered lines (`record`)
//! - timestamp parsing/formatting (`timestamp`)

pub mod record;
pub mod schema;
pub mod timestamp;

pub use record::*;
pub use schema::*;
pub use timestamp::*;
