//! VictoriaMetrics HTTP endpoints.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::Settings;
use crate::error::AppError;
use crate::gateway::IngestionGateway;

const IMPORT_PATH: &str = "/api/v1/import/csv";
const DELETE_PATH: &str = "/api/v1/admin/tsdb/delete_series";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct VictoriaMetricsClient {
    client: Client,
    import_url: String,
    delete_url: String,
}

impl VictoriaMetricsClient {
    /// `base_url` is scheme + host + port, e.g. `http://localhost:8428`.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::transport(format!("Failed to build HTTP client: {e}")))?;
        let base_url = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            import_url: format!("{base_url}{IMPORT_PATH}"),
            delete_url: format!("{base_url}{DELETE_PATH}"),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Self::new(&settings.base_url())
    }

    pub fn import_url(&self) -> &str {
        &self.import_url
    }

    pub fn delete_url(&self) -> &str {
        &self.delete_url
    }
}

impl IngestionGateway for VictoriaMetricsClient {
    fn ingest(&mut self, body: &str, format: &str) -> Result<(), AppError> {
        let resp = self
            .client
            .post(&self.import_url)
            .query(&[("format", format)])
            .header(CONTENT_TYPE, "text/csv")
            .body(body.to_string())
            .send()
            .map_err(|e| AppError::transport(format!("Import request failed: {e}")))?;
        check_status(resp, "Import")
    }

    fn delete_series(&mut self, matcher: &str) -> Result<(), AppError> {
        let resp = self
            .client
            .post(&self.delete_url)
            .form(&[("match[]", matcher)])
            .send()
            .map_err(|e| AppError::transport(format!("Delete request failed: {e}")))?;
        check_status(resp, "Delete")
    }
}

fn check_status(resp: Response, what: &str) -> Result<(), AppError> {
    let status = resp.status();
    debug!(%status, "{what} response");
    if status.is_success() {
        return Ok(());
    }
    let detail = resp.text().unwrap_or_default();
    Err(AppError::transport(format!(
        "{what} request failed with status {status}: {}",
        detail.trim()
    )))
}
