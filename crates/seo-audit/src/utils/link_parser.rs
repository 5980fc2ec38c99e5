use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Schemes that never point at a fetchable page.
const SKIPPED_SCHEMES: [&str; 3] = ["javascript:", "mailto:", "tel:"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    Internal,
    External,
}

#[derive(Debug, Error)]
pub enum LinkParseError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(String),
}

/// Resolves an anchor `href` against the page URL.
///
/// Returns `None` for empty hrefs, pure fragments, `javascript:`, `mailto:`
/// and `tel:` links, and anything that cannot be joined onto `base_url`.
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }
    base_url.join(href).ok()
}

/// Classifies `link` relative to the host of the page it was found on.
///
/// Hostless links and links to the page host or one of its subdomains are
/// internal. Ports are ignored.
pub fn classify_link(link: &Url, page_host: Option<&str>) -> LinkType {
    let Some(link_host) = link.host_str() else {
        return LinkType::Internal;
    };
    let Some(page_host) = page_host else {
        return LinkType::External;
    };

    let link_host = link_host.to_ascii_lowercase();
    let page_host = page_host.to_ascii_lowercase();
    if link_host == page_host || link_host.ends_with(&format!(".{}", page_host)) {
        LinkType::Internal
    } else {
        LinkType::External
    }
}

pub trait FromUrl {
    fn to_url(self) -> Result<Url, LinkParseError>;
}

impl FromUrl for Url {
    fn to_url(self) -> Result<Url, LinkParseError> {
        Ok(self)
    }
}

impl FromUrl for String {
    fn to_url(self) -> Result<Url, LinkParseError> {
        Url::parse(self.trim()).map_err(|e| LinkParseError::UrlParseError(e.to_string()))
    }
}

impl FromUrl for &str {
    fn to_url(self) -> Result<Url, LinkParseError> {
        Url::parse(self.trim()).map_err(|e| LinkParseError::UrlParseError(e.to_string()))
    }
}
