use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Outcome of probing a single link.
///
/// Timeouts and transport failures are kept apart from real HTTP codes so a
/// genuine `408` or `0` reply can never be mistaken for either.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    Http(u16),
    Timeout,
    TransportError,
}

impl LinkStatus {
    /// Numeric code reported for [`LinkStatus::Timeout`].
    pub const TIMEOUT_CODE: u16 = 408;
    /// Numeric code reported for [`LinkStatus::TransportError`].
    pub const TRANSPORT_ERROR_CODE: u16 = 0;

    /// Flat numeric code, with the sentinels mapped to their reserved values.
    pub fn code(&self) -> u16 {
        match self {
            LinkStatus::Http(code) => *code,
            LinkStatus::Timeout => Self::TIMEOUT_CODE,
            LinkStatus::TransportError => Self::TRANSPORT_ERROR_CODE,
        }
    }

    pub fn is_broken(&self) -> bool {
        match self {
            LinkStatus::Http(code) => *code >= 400,
            LinkStatus::Timeout | LinkStatus::TransportError => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Probe timed out")]
    Timeout,
    #[error("Failed to reach URL: {0}")]
    Transport(String),
}

/// Issues a single request and reports the response status.
///
/// Implementations follow redirects and must not read a `GET` body beyond
/// what is needed to obtain the status line.
#[async_trait::async_trait]
pub trait HttpProbe: Send + Sync {
    async fn send(&self, method: ProbeMethod, url: &Url) -> Result<u16, ProbeError>;
}

#[async_trait::async_trait]
impl<T: HttpProbe + ?Sized> HttpProbe for Arc<T> {
    async fn send(&self, method: ProbeMethod, url: &Url) -> Result<u16, ProbeError> {
        (**self).send(method, url).await
    }
}

async fn send_with_timeout<P: HttpProbe + ?Sized>(
    probe: &P,
    method: ProbeMethod,
    url: &Url,
    timeout: Duration,
) -> Result<u16, ProbeError> {
    match tokio::time::timeout(timeout, probe.send(method, url)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout),
    }
}

/// Checks whether `url` exists.
///
/// Sends `HEAD`; a `405` reply gets exactly one `GET` retry. Every request
/// carries its own `timeout`. Failures never escape: they become
/// [`LinkStatus::Timeout`] or [`LinkStatus::TransportError`].
pub async fn probe_link<P: HttpProbe + ?Sized>(
    probe: &P,
    url: &Url,
    timeout: Duration,
) -> LinkStatus {
    let mut result = send_with_timeout(probe, ProbeMethod::Head, url, timeout).await;
    if matches!(result, Ok(405)) {
        debug!(%url, "HEAD not allowed, retrying with GET");
        result = send_with_timeout(probe, ProbeMethod::Get, url, timeout).await;
    }

    let status = match result {
        Ok(code) => LinkStatus::Http(code),
        Err(ProbeError::Timeout) => LinkStatus::Timeout,
        Err(ProbeError::Transport(reason)) => {
            debug!(%url, %reason, "link probe failed");
            LinkStatus::TransportError
        }
    };
    debug!(%url, status = status.code(), "probed link");
    status
}
