//! Per-scope running totals.

pub mod accumulator;
pub mod registry;

pub use accumulator::*;
pub use registry::*;
