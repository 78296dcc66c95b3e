//! `tiltify-import` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - aggregation and formatting are testable without a terminal or a store
//! - the store and the confirmation prompt can be swapped at the seams

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod io;
pub mod logging;
pub mod protocol;
pub mod report;
