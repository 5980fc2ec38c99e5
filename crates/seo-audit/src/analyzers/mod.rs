use url::Url;

use crate::utils::document::Document;

pub mod content;
pub mod links;
pub mod meta;
pub mod technical;

/// Everything a synchronous analyzer may look at.
pub struct PageContext<'a> {
    pub document: &'a dyn Document,
    /// Final URL of the page after redirects.
    pub url: &'a Url,
    pub response_time_ms: u64,
}

impl<'a> PageContext<'a> {
    pub fn new(document: &'a dyn Document, url: &'a Url, response_time_ms: u64) -> Self {
        Self {
            document,
            url,
            response_time_ms,
        }
    }
}

// Synchronous page analyzer
pub trait PageAnalyzer {
    type Output;

    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Never fails: missing markup maps to the output's documented defaults.
    fn analyze(&self, page: &PageContext<'_>) -> Self::Output;
}
