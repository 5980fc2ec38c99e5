use std::time::Instant;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::AuditConfig;
use crate::AuditError;

/// A page retrieved successfully, ready to be parsed.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub status: u16,
    /// URL after redirects.
    pub final_url: Url,
    pub response_time_ms: u64,
}

/// Plain HTTP retrieval of the page under audit. No script execution.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let client = Client::builder()
            .user_agent(config.page_user_agent.as_str())
            .timeout(config.page_timeout())
            .build()
            .map_err(|e| AuditError::ClientError(e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetches `url`, timing the full round trip including the body.
    ///
    /// Transport failures become [`AuditError::FetchError`]; replies of 400
    /// and above become [`AuditError::HttpStatus`] with the upstream code.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, AuditError> {
        let start = Instant::now();

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(%url, error = %e, "failed to fetch page");
            AuditError::FetchError(e.to_string())
        })?;

        let status = response.status();
        if status.as_u16() >= 400 {
            warn!(%url, status = status.as_u16(), "page returned an error status");
            return Err(AuditError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| AuditError::FetchError(e.to_string()))?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        debug!(%final_url, status = status.as_u16(), response_time_ms, "fetched page");
        Ok(FetchedPage {
            html,
            status: status.as_u16(),
            final_url,
            response_time_ms,
        })
    }
}
