//! On-page SEO audit of a single rendered document.
//!
//! Three synchronous analyzers and the link checker read the same parsed
//! [`Document`]; [`scoring::calculate_score`] folds their results into a
//! 0-100 score.

use tracing::debug;
use url::Url;

pub mod analyzers;
pub mod scoring;
pub mod utils;

pub use analyzers::content::{ContentAnalyzer, ContentResult, Heading, ImageInfo, Keyword};
pub use analyzers::links::{
    LinkCheckConfig, LinkHealthChecker, LinkRecord, LinkResult, extract_links,
};
pub use analyzers::meta::{MetaAnalyzer, MetaResult};
pub use analyzers::technical::{TechnicalAnalyzer, TechnicalResult};
pub use analyzers::{PageAnalyzer, PageContext};
pub use scoring::{ScoreBreakdown, ScoreResult, calculate_score};
pub use utils::document::{Document, Element, HtmlDocument};
pub use utils::link_parser::{FromUrl, LinkParseError, LinkType};
pub use utils::probe::{HttpProbe, LinkStatus, ProbeError, ProbeMethod};

fn run<A: PageAnalyzer>(analyzer: A, page: &PageContext<'_>) -> A::Output {
    debug!(
        analyzer = analyzer.name(),
        checks = analyzer.description(),
        "running analyzer"
    );
    analyzer.analyze(page)
}

/// Everything that can be read from the document without touching the network.
///
/// Holds no reference to the document, so it can outlive it while links are
/// being probed.
#[derive(Debug, Clone)]
pub struct PageSignals {
    pub meta: MetaResult,
    pub content: ContentResult,
    pub technical: TechnicalResult,
    /// Unique links in page order, not yet probed.
    pub links: Vec<LinkRecord>,
}

pub fn collect_signals(
    document: &dyn Document,
    final_url: &Url,
    response_time_ms: u64,
) -> PageSignals {
    let page = PageContext::new(document, final_url, response_time_ms);
    PageSignals {
        meta: run(MetaAnalyzer::new(), &page),
        content: run(ContentAnalyzer::new(), &page),
        technical: run(TechnicalAnalyzer::new(), &page),
        links: extract_links(document, final_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct AlwaysOk;

    #[async_trait::async_trait]
    impl HttpProbe for AlwaysOk {
        async fn send(&self, _method: ProbeMethod, _url: &Url) -> Result<u16, ProbeError> {
            Ok(200)
        }
    }

    struct NeverAnswers;

    #[async_trait::async_trait]
    impl HttpProbe for NeverAnswers {
        async fn send(&self, _method: ProbeMethod, _url: &Url) -> Result<u16, ProbeError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(200)
        }
    }

    fn words(count: usize) -> String {
        (0..count).map(|i| format!("word{i} ")).collect()
    }

    #[tokio::test]
    async fn test_end_to_end_page() {
        let html = format!(
            r#"
            <html>
                <head>
                    <title>Hand Made Ceramic Mugs Shops</title>
                    <meta name="description" content="{description}">
                    <meta name="viewport" content="width=device-width, initial-scale=1">
                </head>
                <body>
                    <h1>Ceramic Mugs</h1>
                    <p>{body}</p>
                </body>
            </html>
        "#,
            description = "d".repeat(120),
            body = words(493),
        );
        let document = HtmlDocument::parse(&html);
        let url = Url::parse("https://shop.example.com/mugs").unwrap();

        let signals = collect_signals(&document, &url, 800);
        assert_eq!(signals.meta.title_length, 28);
        assert_eq!(signals.content.word_count, 500);
        assert!(signals.links.is_empty());

        let links = LinkHealthChecker::new(AlwaysOk)
            .check_links(signals.links)
            .await;
        let score = calculate_score(&signals.meta, &signals.content, &links, &signals.technical);

        assert_eq!(
            score.breakdown,
            ScoreBreakdown {
                meta: 20,
                content: 25,
                links: 20,
                technical: 25,
            }
        );
        assert_eq!(score.total, 90);
    }

    #[test]
    fn test_analyzers_are_named() {
        let names = [
            MetaAnalyzer::new().name().to_string(),
            ContentAnalyzer::new().name().to_string(),
            TechnicalAnalyzer::new().name().to_string(),
        ];
        assert_eq!(names, ["Meta", "Content", "Technical"]);
        assert!(!MetaAnalyzer::new().description().is_empty());
        assert!(!ContentAnalyzer::new().description().is_empty());
        assert!(!TechnicalAnalyzer::new().description().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_link_check_returns_promptly() {
        let html = r#"<html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#;
        let document = HtmlDocument::parse(html);
        let url = Url::parse("https://example.com/").unwrap();
        let links = collect_signals(&document, &url, 0).links;

        let checker = LinkHealthChecker::new(NeverAnswers);
        let outcome =
            tokio::time::timeout(Duration::from_millis(50), checker.check_links(links)).await;
        assert!(outcome.is_err());
    }
}
