//! Metrics store access.
//!
//! The import only needs two operations from the store, so they sit behind a
//! small trait: the real HTTP client (`victoria`) and a stdout printer for dry
//! runs (`stdout`) both implement it, as do the recording fakes in tests.

pub mod stdout;
pub mod victoria;

pub use stdout::StdoutGateway;
pub use victoria::VictoriaMetricsClient;

use crate::error::AppError;

pub trait IngestionGateway {
    /// Write one batch of lines described by the field-tag schema `format`.
    fn ingest(&mut self, body: &str, format: &str) -> Result<(), AppError>;

    /// Delete every series matching `matcher`.
    fn delete_series(&mut self, matcher: &str) -> Result<(), AppError>;
}
