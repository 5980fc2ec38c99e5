use serde::{Deserialize, Serialize};

use super::{PageAnalyzer, PageContext};
use crate::utils::document::Document;

/// Rough average glyph width used to estimate how wide a title renders.
pub const TITLE_CHAR_WIDTH_PX: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MetaResult {
    pub title: Option<String>,
    pub title_length: usize,
    /// `title_length * 8`, a heuristic rather than a font measurement.
    pub title_pixel_width: usize,
    pub description: Option<String>,
    pub description_length: usize,
    pub canonical_url: Option<String>,
    pub robots_directive: Option<String>,
    pub favicon_url: Option<String>,
}

// Meta Analyzer
pub struct MetaAnalyzer {}

impl Default for MetaAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    fn meta_content(document: &dyn Document, name: &str) -> Option<String> {
        document
            .first_with_attr("meta", "name", name)
            .and_then(|meta| meta.attr_trimmed("content").map(str::to_string))
    }

    fn link_href(document: &dyn Document, rel: &str) -> Option<String> {
        document
            .first_with_attr("link", "rel", rel)
            .and_then(|link| link.attr_trimmed("href").map(str::to_string))
    }
}

impl PageAnalyzer for MetaAnalyzer {
    type Output = MetaResult;

    fn name(&self) -> &str {
        "Meta"
    }

    fn description(&self) -> &str {
        "Title, meta description, canonical URL, robots directive and favicon."
    }

    fn analyze(&self, page: &PageContext<'_>) -> MetaResult {
        let document = page.document;

        let title = document
            .first("title")
            .map(|title| title.text().trim().to_string())
            .filter(|title| !title.is_empty());
        let title_length = title.as_ref().map_or(0, |t| t.chars().count());

        let description = Self::meta_content(document, "description");
        let description_length = description.as_ref().map_or(0, |d| d.chars().count());

        let favicon_url = Self::link_href(document, "icon")
            .or_else(|| Self::link_href(document, "shortcut icon"));

        MetaResult {
            title,
            title_length,
            title_pixel_width: title_length * TITLE_CHAR_WIDTH_PX,
            description,
            description_length,
            canonical_url: Self::link_href(document, "canonical"),
            robots_directive: Self::meta_content(document, "robots"),
            favicon_url,
        }
    }
}
