use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use tokio::task::JoinHandle;

use quiz_core::quiz::FinalReport;

use crate::config::QuizConfig;
use crate::error::ReportError;

/// Destination for final reports.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Deliver a report and wait for the acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` when the collector is unreachable or rejects the
    /// report.
    async fn submit_results(&self, report: &FinalReport) -> Result<(), ReportError>;
}

/// Result collector served over HTTP (`POST {base}/submit-test`).
#[derive(Clone, Debug)]
pub struct HttpResultReporter {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpResultReporter {
    #[must_use]
    pub fn new(config: &QuizConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: &QuizConfig) -> Self {
        Self {
            client,
            url: config.submit_url(),
            timeout: config.request_timeout,
        }
    }
}

#[async_trait]
impl ResultSink for HttpResultReporter {
    async fn submit_results(&self, report: &FinalReport) -> Result<(), ReportError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(report)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::HttpStatus(status));
        }

        let body = response.text().await?;
        info!("result collector acknowledged: {body}");
        Ok(())
    }
}

/// Fire-and-forget delivery of final reports.
///
/// Delivery failures are logged and dropped; they never reach the session.
#[derive(Clone)]
pub struct ResultReporter {
    sink: Arc<dyn ResultSink>,
}

impl ResultReporter {
    #[must_use]
    pub fn new(sink: Arc<dyn ResultSink>) -> Self {
        Self { sink }
    }

    /// Spawn delivery of `report` on the current runtime.
    ///
    /// The returned handle may be awaited to flush delivery before shutdown,
    /// or dropped.
    pub fn dispatch(&self, report: FinalReport) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            let session_id = report.session_id;
            match sink.submit_results(&report).await {
                Ok(()) => debug!("session {session_id}: results delivered"),
                Err(err) => warn!("session {session_id}: failed to deliver results: {err}"),
            }
        })
    }
}
