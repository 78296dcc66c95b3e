//! Dry-run gateway: prints what would be sent.

use std::io::{self, Stdout, Write};

use crate::error::AppError;
use crate::gateway::IngestionGateway;

/// Writes `<format>\t<line>` per import and `delete\t<matcher>` per deletion.
pub struct StdoutGateway<W: Write = Stdout> {
    out: W,
}

impl StdoutGateway<Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutGateway<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutGateway<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> IngestionGateway for StdoutGateway<W> {
    fn ingest(&mut self, body: &str, format: &str) -> Result<(), AppError> {
        writeln!(self.out, "{format}\t{body}")
            .map_err(|e| AppError::transport(format!("Failed to write dry-run output: {e}")))
    }

    fn delete_series(&mut self, matcher: &str) -> Result<(), AppError> {
        writeln!(self.out, "delete\t{matcher}")
            .map_err(|e| AppError::transport(format!("Failed to write dry-run output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_format_and_line() {
        let mut gateway = StdoutGateway::with_writer(Vec::new());
        gateway.delete_series(r#"donation{campaign="c"}"#).unwrap();
        gateway.ingest("5,1000,c", "1:metric:donation_total,2:time:unix_ms,3:label:campaign").unwrap();
        let out = String::from_utf8(gateway.into_inner()).unwrap();
        assert_eq!(
            out,
            "delete\tdonation{campaign=\"c\"}\n\
             1:metric:donation_total,2:time:unix_ms,3:label:campaign\t5,1000,c\n"
        );
    }
}
