use std::time::Duration;

use prep_logging::{prep_request_debug, prep_request_info};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::stream::{consume_stream, EventSink};
use crate::{AnalyzeError, FailureKind, RequestId, StreamSummary};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_ENDPOINT: &str = "/api/analyze-meetings";

#[derive(Debug, Clone)]
pub struct AnalyzeSettings {
    pub server_url: String,
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Upper bound for the whole request including the body. `None` waits forever.
    pub request_timeout: Option<Duration>,
    /// Parse an unterminated last line instead of dropping it.
    pub flush_trailing_line: bool,
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            flush_trailing_line: false,
        }
    }
}

impl AnalyzeSettings {
    pub fn endpoint_url(&self) -> Result<Url, AnalyzeError> {
        let base = Url::parse(&self.server_url)?;
        Ok(base.join(&self.endpoint)?)
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    date: &'a str,
}

#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    /// Run one analysis for `date_label`, emitting every decoded line to `sink`.
    async fn analyze(
        &self,
        request_id: RequestId,
        date_label: &str,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, AnalyzeError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalyzer {
    settings: AnalyzeSettings,
    client: reqwest::Client,
}

impl ReqwestAnalyzer {
    pub fn new(settings: AnalyzeSettings) -> Result<Self, AnalyzeError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| AnalyzeError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl Analyzer for ReqwestAnalyzer {
    async fn analyze(
        &self,
        request_id: RequestId,
        date_label: &str,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, AnalyzeError> {
        let url = self.settings.endpoint_url()?;
        let body = serde_json::to_vec(&AnalyzeRequest { date: date_label })
            .map_err(|err| AnalyzeError::new(FailureKind::InvalidRequest, err.to_string()))?;

        prep_request_info!(request_id, "POST {} date={:?}", url, date_label);
        let send = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalyzeError::cancelled()),
            response = send => response?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzeError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        prep_request_debug!(
            request_id,
            "streaming response, content-length={:?}",
            response.content_length()
        );

        consume_stream(
            request_id,
            response.bytes_stream(),
            self.settings.flush_trailing_line,
            sink,
            cancel,
        )
        .await
    }
}
