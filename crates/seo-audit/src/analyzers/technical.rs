use serde::{Deserialize, Serialize};

use super::{PageAnalyzer, PageContext};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TechnicalResult {
    pub is_https: bool,
    /// Measured by whoever fetched the page, passed through untouched.
    pub response_time_ms: u64,
    pub mobile_viewport_present: bool,
    pub viewport: Option<String>,
}

// Technical Analyzer
pub struct TechnicalAnalyzer {}

impl Default for TechnicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnicalAnalyzer {
    pub fn new() -> Self {
        Self {}
    }
}

impl PageAnalyzer for TechnicalAnalyzer {
    type Output = TechnicalResult;

    fn name(&self) -> &str {
        "Technical"
    }

    fn description(&self) -> &str {
        "HTTPS, server response time and mobile viewport declaration."
    }

    fn analyze(&self, page: &PageContext<'_>) -> TechnicalResult {
        let viewport = page
            .document
            .first_with_attr("meta", "name", "viewport")
            .and_then(|meta| meta.attr_trimmed("content").map(str::to_string));

        TechnicalResult {
            is_https: page.url.scheme().eq_ignore_ascii_case("https"),
            response_time_ms: page.response_time_ms,
            mobile_viewport_present: viewport.is_some(),
            viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::document::HtmlDocument;
    use url::Url;

    fn analyze(html: &str, url: &str, response_time_ms: u64) -> TechnicalResult {
        let document = HtmlDocument::parse(html);
        let url = Url::parse(url).unwrap();
        TechnicalAnalyzer::new().analyze(&PageContext::new(&document, &url, response_time_ms))
    }

    #[test]
    fn test_technical_analyzer() {
        let technical = analyze(
            r#"
            <html>
                <head>
                    <meta name="viewport" content="width=device-width, initial-scale=1">
                </head>
            </html>
        "#,
            "HTTPS://example.com/",
            812,
        );

        assert!(technical.is_https);
        assert_eq!(technical.response_time_ms, 812);
        assert!(technical.mobile_viewport_present);
        assert_eq!(
            technical.viewport.as_deref(),
            Some("width=device-width, initial-scale=1")
        );
    }

    #[test]
    fn test_plain_http_without_viewport() {
        let technical = analyze("<html><head></head></html>", "http://example.com/", 0);

        assert!(!technical.is_https);
        assert!(!technical.mobile_viewport_present);
        assert!(technical.viewport.is_none());
    }

    #[test]
    fn test_empty_viewport_content_is_not_mobile_ready() {
        let technical = analyze(
            r#"<html><head><meta name="viewport" content=""></head></html>"#,
            "https://example.com/",
            0,
        );
        assert!(!technical.mobile_viewport_present);
    }
}
