use seo_audit::{
    calculate_score, collect_signals, ContentResult, FromUrl, HtmlDocument, HttpProbe,
    LinkHealthChecker, LinkResult, MetaResult, ScoreResult, TechnicalResult,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::config::AuditConfig;
use crate::fetch::{FetchedPage, PageFetcher};
use crate::probe::ReqwestProbe;
use crate::AuditError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// URL as requested.
    pub url: String,
    pub final_url: String,
    pub http_status: u16,
    pub meta: MetaResult,
    pub content: ContentResult,
    pub links: LinkResult,
    pub technical: TechnicalResult,
    pub score: ScoreResult,
}

/// Checks that `url` is an absolute http(s) URL with a host.
pub fn validate_url<T: FromUrl>(url: T) -> Result<Url, AuditError> {
    let url = url
        .to_url()
        .map_err(|e| AuditError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AuditError::InvalidUrl(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AuditError::InvalidUrl(format!("missing host: {}", url)));
    }
    Ok(url)
}

pub struct Auditor<P = ReqwestProbe> {
    fetcher: PageFetcher,
    checker: LinkHealthChecker<P>,
}

impl Auditor<ReqwestProbe> {
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let probe = ReqwestProbe::new(&config.probe_user_agent, config.probe_timeout())
            .map_err(|e| AuditError::ClientError(e.to_string()))?;
        Self::with_probe(config, probe)
    }
}

impl<P: HttpProbe> Auditor<P> {
    pub fn with_probe(config: &AuditConfig, probe: P) -> Result<Self, AuditError> {
        config.validate()?;
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            checker: LinkHealthChecker::with_config(probe, config.link_check()),
        })
    }

    /// Fetches and audits a single page.
    pub async fn audit<T: FromUrl>(&self, url: T) -> Result<AuditReport, AuditError> {
        let url = validate_url(url)?;
        info!(%url, "starting audit");
        let page = self.fetcher.fetch(&url).await?;
        Ok(self.audit_page(&url, page).await)
    }

    /// Audits an already fetched page. Only link probing touches the network.
    pub async fn audit_page(&self, requested: &Url, page: FetchedPage) -> AuditReport {
        // The parsed tree is dropped before any probe is awaited.
        let signals = {
            let document = HtmlDocument::parse(&page.html);
            collect_signals(&document, &page.final_url, page.response_time_ms)
        };

        let links = self.checker.check_links(signals.links).await;
        let score = calculate_score(&signals.meta, &signals.content, &links, &signals.technical);
        info!(
            url = %page.final_url,
            total = score.total,
            meta = score.breakdown.meta,
            content = score.breakdown.content,
            links = score.breakdown.links,
            technical = score.breakdown.technical,
            "audit finished"
        );

        AuditReport {
            url: requested.to_string(),
            final_url: page.final_url.to_string(),
            http_status: page.status,
            meta: signals.meta,
            content: signals.content,
            links,
            technical: signals.technical,
            score,
        }
    }
}
