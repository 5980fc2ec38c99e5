use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{PageAnalyzer, PageContext};
use crate::utils::stop_words::is_stop_word;

pub const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];
pub const TOP_KEYWORD_COUNT: usize = 5;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `h1` through 6 for `h6`.
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub term: String,
    pub frequency: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub has_alt: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContentResult {
    /// Non-empty heading texts per level, every level from 1 to 6 present.
    pub headings_by_level: BTreeMap<u8, Vec<String>>,
    pub h1_count: usize,
    /// All non-empty headings in document order.
    pub structure_hierarchy: Vec<Heading>,
    pub word_count: usize,
    pub top_keywords: Vec<Keyword>,
    pub images: Vec<ImageInfo>,
    pub missing_alt_count: usize,
}

impl ContentResult {
    pub fn total_images(&self) -> usize {
        self.images.len()
    }
}

impl Default for ContentResult {
    fn default() -> Self {
        Self {
            headings_by_level: (1..=6).map(|level| (level, Vec::new())).collect(),
            h1_count: 0,
            structure_hierarchy: Vec::new(),
            word_count: 0,
            top_keywords: Vec::new(),
            images: Vec::new(),
            missing_alt_count: 0,
        }
    }
}

// Content Analyzer
pub struct ContentAnalyzer {}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentAnalyzer {
    pub fn new() -> Self {
        Self {}
    }
}

/// Lowercased word tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn is_keyword_candidate(word: &str) -> bool {
    word.chars().count() > 2
        && !word.chars().all(char::is_numeric)
        && !is_stop_word(word)
}

/// The most frequent keyword candidates, most frequent first.
///
/// Equal frequencies keep the order in which the words first appeared.
pub fn top_keywords(words: &[String], limit: usize) -> Vec<Keyword> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<Keyword> = Vec::new();

    for word in words.iter().filter(|w| is_keyword_candidate(w)) {
        match positions.get(word.as_str()) {
            Some(&index) => counts[index].frequency += 1,
            None => {
                positions.insert(word, counts.len());
                counts.push(Keyword {
                    term: word.clone(),
                    frequency: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    counts.truncate(limit);
    counts
}

impl PageAnalyzer for ContentAnalyzer {
    type Output = ContentResult;

    fn name(&self) -> &str {
        "Content"
    }

    fn description(&self) -> &str {
        "Heading structure, visible word count, top keywords and image alt text coverage."
    }

    fn analyze(&self, page: &PageContext<'_>) -> ContentResult {
        let document = page.document;
        let mut result = ContentResult::default();

        for heading in document.elements(&HEADING_TAGS) {
            let text = heading.text().trim();
            if text.is_empty() {
                continue;
            }
            let Some(level) = heading
                .name()
                .strip_prefix('h')
                .and_then(|level| level.parse::<u8>().ok())
            else {
                continue;
            };
            result
                .headings_by_level
                .entry(level)
                .or_default()
                .push(text.to_string());
            result.structure_hierarchy.push(Heading {
                level,
                text: text.to_string(),
            });
        }
        result.h1_count = result.headings_by_level.get(&1).map_or(0, Vec::len);

        let words = tokenize(&document.visible_text());
        result.word_count = words.len();
        result.top_keywords = top_keywords(&words, TOP_KEYWORD_COUNT);

        for image in document.elements(&["img"]) {
            let alt = image.attr("alt").map(str::to_string);
            let has_alt = alt.as_ref().is_some_and(|alt| !alt.is_empty());
            if !has_alt {
                result.missing_alt_count += 1;
            }
            result.images.push(ImageInfo {
                src: image.attr("src").map(str::to_string),
                alt,
                has_alt,
            });
        }

        result
    }
}
