//! Weighted 0-100 health score built from the four analyzer results.

use serde::{Deserialize, Serialize};

use crate::analyzers::content::ContentResult;
use crate::analyzers::links::LinkResult;
use crate::analyzers::meta::MetaResult;
use crate::analyzers::technical::TechnicalResult;

pub const MAX_META_SCORE: u32 = 25;
pub const MAX_CONTENT_SCORE: u32 = 30;
pub const MAX_LINKS_SCORE: u32 = 20;
pub const MAX_TECHNICAL_SCORE: u32 = 25;
pub const MAX_TOTAL_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub meta: u32,
    pub content: u32,
    pub links: u32,
    pub technical: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScoreResult {
    pub total: u32,
    pub breakdown: ScoreBreakdown,
}

/// 10 inside the optimal length range, 5 when present but outside it.
fn length_points(present: bool, length: usize, min: usize, max: usize) -> u32 {
    match (present, length) {
        (false, _) | (true, 0) => 0,
        (true, length) if (min..=max).contains(&length) => 10,
        _ => 5,
    }
}

pub fn score_meta(meta: &MetaResult) -> u32 {
    let title = length_points(meta.title.is_some(), meta.title_length, 10, 60);
    let description = length_points(meta.description.is_some(), meta.description_length, 50, 160);
    let favicon = if meta.favicon_url.is_some() { 5 } else { 0 };

    (title + description + favicon).min(MAX_META_SCORE)
}

pub fn score_content(content: &ContentResult) -> u32 {
    let headings = match content.h1_count {
        0 => 0,
        1 => 10,
        _ => 5,
    };

    let total_images = content.total_images();
    let images = if total_images == 0 || content.missing_alt_count == 0 {
        10
    } else {
        let missing = content.missing_alt_count as f64 / total_images as f64;
        if missing < 0.2 {
            5
        } else if missing < 0.5 {
            2
        } else {
            0
        }
    };

    let length = match content.word_count {
        count if count > 600 => 10,
        count if count > 300 => 5,
        _ => 0,
    };

    (headings + images + length).min(MAX_CONTENT_SCORE)
}

/// Full marks when nothing was checked: a page without links has nothing broken.
pub fn score_links(links: &LinkResult) -> u32 {
    let probed: Vec<_> = links
        .checked_links
        .iter()
        .filter_map(|link| link.status)
        .collect();
    if probed.is_empty() {
        return MAX_LINKS_SCORE;
    }

    let broken = probed.iter().filter(|status| status.is_broken()).count();
    let broken_fraction = broken as f64 / probed.len() as f64;
    let points = if broken == 0 {
        20
    } else if broken_fraction < 0.1 {
        10
    } else if broken_fraction < 0.3 {
        5
    } else {
        0
    };
    points.min(MAX_LINKS_SCORE)
}

pub fn score_technical(technical: &TechnicalResult) -> u32 {
    let https = if technical.is_https { 10 } else { 0 };
    let viewport = if technical.mobile_viewport_present { 10 } else { 0 };
    let speed = match technical.response_time_ms {
        ms if ms < 1000 => 5,
        ms if ms < 2500 => 2,
        _ => 0,
    };

    (https + viewport + speed).min(MAX_TECHNICAL_SCORE)
}

pub fn calculate_score(
    meta: &MetaResult,
    content: &ContentResult,
    links: &LinkResult,
    technical: &TechnicalResult,
) -> ScoreResult {
    let breakdown = ScoreBreakdown {
        meta: score_meta(meta),
        content: score_content(content),
        links: score_links(links),
        technical: score_technical(technical),
    };
    let total = breakdown.meta + breakdown.content + breakdown.links + breakdown.technical;

    ScoreResult {
        total: total.min(MAX_TOTAL_SCORE),
        breakdown,
    }
}
