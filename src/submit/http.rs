//! JSON-over-HTTP submitter.

use crate::core::{FacturaError, InvoiceDocument, SubmissionOutcome};

use super::Submitter;
use super::config::EndpointConfig;

/// Posts the invoice document as JSON to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    config: EndpointConfig,
}

impl HttpSubmitter {
    pub fn new(config: EndpointConfig) -> Result<Self, FacturaError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FacturaError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

impl Submitter for HttpSubmitter {
    async fn submit(&self, document: &InvoiceDocument) -> SubmissionOutcome {
        let resp = match self
            .client
            .post(&self.config.url)
            .json(document)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(url = %self.config.url, error = %e, "invoice endpoint unreachable");
                return SubmissionOutcome::TransportUnavailable(e.to_string());
            }
        };

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(%status, "invoice endpoint acknowledged");
            return SubmissionOutcome::Accepted;
        }

        let body = resp.text().await.unwrap_or_default();
        SubmissionOutcome::Rejected(format!("HTTP {status}: {body}"))
    }
}
