use std::collections::HashSet;
use std::time::Duration;

use futures::future;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::utils::document::Document;
use crate::utils::link_parser::{LinkType, classify_link, resolve_href};
use crate::utils::probe::{HttpProbe, LinkStatus, probe_link};

pub const MAX_ANCHOR_TEXT_CHARS: usize = 50;
pub const DEFAULT_MAX_LINKS_TO_CHECK: usize = 20;
pub const DEFAULT_PROBE_CONCURRENCY: usize = 10;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub absolute_url: String,
    pub anchor_text: String,
    pub link_type: LinkType,
    /// `None` until the link has been probed.
    pub status: Option<LinkStatus>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LinkResult {
    pub internal_count: usize,
    pub external_count: usize,
    pub total_links: usize,
    /// Leading unique links, in page order, each carrying its probe status.
    pub checked_links: Vec<LinkRecord>,
}

impl LinkResult {
    pub fn broken_links(&self) -> impl Iterator<Item = &LinkRecord> {
        self.checked_links
            .iter()
            .filter(|link| link.status.is_some_and(|status| status.is_broken()))
    }
}

/// Collects the page's unique outbound links in the order they appear.
///
/// Duplicates (same absolute URL) keep the anchor text of their first
/// occurrence.
pub fn extract_links(document: &dyn Document, page_url: &Url) -> Vec<LinkRecord> {
    let page_host = page_url.host_str();
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.elements(&["a"]) {
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(href, page_url) else {
            continue;
        };
        let absolute_url = url.to_string();
        if !seen.insert(absolute_url.clone()) {
            continue;
        }

        links.push(LinkRecord {
            link_type: classify_link(&url, page_host),
            absolute_url,
            anchor_text: anchor.text().chars().take(MAX_ANCHOR_TEXT_CHARS).collect(),
            status: None,
        });
    }

    links
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCheckConfig {
    /// Only this many leading unique links are probed.
    pub max_links_to_check: usize,
    /// Probes in flight at once.
    pub concurrency: usize,
    pub probe_timeout: Duration,
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        Self {
            max_links_to_check: DEFAULT_MAX_LINKS_TO_CHECK,
            concurrency: DEFAULT_PROBE_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Extracts, classifies and probes a page's links.
pub struct LinkHealthChecker<P> {
    probe: P,
    config: LinkCheckConfig,
}

impl<P: HttpProbe> LinkHealthChecker<P> {
    pub fn new(probe: P) -> Self {
        Self::with_config(probe, LinkCheckConfig::default())
    }

    pub fn with_config(probe: P, config: LinkCheckConfig) -> Self {
        Self { probe, config }
    }

    pub async fn check(&self, document: &dyn Document, page_url: &Url) -> LinkResult {
        let links = extract_links(document, page_url);
        self.check_links(links).await
    }

    /// Counts every link, then probes the leading `max_links_to_check` of them.
    ///
    /// Probes share a pool of `concurrency` slots. A failing probe only
    /// affects its own record; the batch itself never fails. Dropping the
    /// returned future cancels every probe still in flight.
    pub async fn check_links(&self, links: Vec<LinkRecord>) -> LinkResult {
        let total_links = links.len();
        let internal_count = links
            .iter()
            .filter(|link| link.link_type == LinkType::Internal)
            .count();

        let mut checked_links: Vec<LinkRecord> = links
            .into_iter()
            .take(self.config.max_links_to_check)
            .collect();
        let targets: Vec<(usize, Option<Url>)> = checked_links
            .iter()
            .enumerate()
            .map(|(index, link)| (index, Url::parse(&link.absolute_url).ok()))
            .collect();

        info!(
            total = total_links,
            checking = targets.len(),
            concurrency = self.config.concurrency,
            "checking link health"
        );

        let timeout = self.config.probe_timeout;
        stream::iter(targets)
            .map(|(index, url)| async move {
                let status = match url {
                    Some(url) => probe_link(&self.probe, &url, timeout).await,
                    None => LinkStatus::TransportError,
                };
                (index, status)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .for_each(|(index, status)| {
                checked_links[index].status = Some(status);
                future::ready(())
            })
            .await;

        let result = LinkResult {
            internal_count,
            external_count: total_links - internal_count,
            total_links,
            checked_links,
        };
        debug!(broken = result.broken_links().count(), "link check finished");
        result
    }
}
