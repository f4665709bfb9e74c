//! Weighted 0-100 SEO score
//!
//! Each bucket is computed from its own slice of [`PageFeatures`]; the
//! bucket maxima add up to exactly 100.

use crate::types::{PageFeatures, ScoreBreakdown};

/// Ideal `<title>` length in characters
pub const TITLE_IDEAL: (usize, usize) = (30, 60);
/// Titles up to this length still earn partial credit
pub const TITLE_ACCEPTABLE_MAX: usize = 70;
/// Ideal meta description length in characters
pub const META_IDEAL: (usize, usize) = (120, 160);
/// Acceptable meta description range for partial credit
pub const META_ACCEPTABLE: (usize, usize) = (50, 200);
/// Word count for full content credit
pub const CONTENT_FULL_WORDS: usize = 300;
/// Word count for partial content credit
pub const CONTENT_PARTIAL_WORDS: usize = 150;

/// Score a page. Never fails; a page with no signals scores zero.
pub fn compute_score(features: &PageFeatures) -> ScoreBreakdown {
    ScoreBreakdown {
        title: score_title(features),
        meta_description: score_meta_description(features),
        headings: score_headings(features),
        content: score_content(features),
        images: score_images(features),
        technical: score_technical(features),
        social: score_social(features),
        mobile: score_mobile(features),
    }
}

fn score_title(features: &PageFeatures) -> u8 {
    let meta = &features.meta;
    let length = meta.title_length;
    let mut score = 0;

    if meta.title.is_some() {
        score += 7;
    }
    if (TITLE_IDEAL.0..=TITLE_IDEAL.1).contains(&length) {
        score += 5;
    } else if (1..TITLE_IDEAL.0).contains(&length)
        || (TITLE_IDEAL.1 + 1..=TITLE_ACCEPTABLE_MAX).contains(&length)
    {
        score += 2;
    }
    if features.focus.has_focus_in_title {
        score += 3;
    }

    score
}

fn score_meta_description(features: &PageFeatures) -> u8 {
    let meta = &features.meta;
    let length = meta.meta_description_length;
    let mut score = 0;

    if meta.meta_description.is_some() {
        score += 7;
    }
    if (META_IDEAL.0..=META_IDEAL.1).contains(&length) {
        score += 5;
    } else if (META_ACCEPTABLE.0..META_IDEAL.0).contains(&length)
        || (META_IDEAL.1 + 1..=META_ACCEPTABLE.1).contains(&length)
    {
        score += 2;
    }
    if features.focus.has_focus_in_meta {
        score += 3;
    }

    score
}

fn score_headings(features: &PageFeatures) -> u8 {
    let headings = &features.headings;
    let mut score = 0;

    match headings.count(1) {
        1 => score += 10,
        2 => score += 5,
        _ => {}
    }
    if headings.count(2) >= 1 {
        score += 2;
    }
    if !features.focus.has_heading_skip && headings.total() > 1 {
        score += 3;
    }

    score
}

fn score_content(features: &PageFeatures) -> u8 {
    let mut score = 0;

    if features.word_count >= CONTENT_FULL_WORDS {
        score += 10;
    } else if features.word_count >= CONTENT_PARTIAL_WORDS {
        score += 5;
    }
    if features.focus.keyword_density.len() >= 5 {
        score += 5;
    }

    score
}

fn score_images(features: &PageFeatures) -> u8 {
    let images = &features.images;
    if images.total == 0 {
        return 0;
    }

    let total = images.total as f64;
    let mut score = 3;

    if images.without_alt == 0 {
        score += 4;
    } else if (images.without_alt as f64) / total < 0.2 {
        score += 2;
    }
    if images.oversized == 0 {
        score += 3;
    } else if (images.oversized as f64) / total < 0.3 {
        score += 1;
    }

    score
}

fn score_technical(features: &PageFeatures) -> u8 {
    let mut score = 0;

    if features.technical.has_https {
        score += 3;
    }
    if features.meta.canonical_url.is_some() {
        score += 2;
    }
    if features.structured_data.has_schema {
        score += 3;
    }
    if features.meta.meta_robots.is_some() {
        score += 2;
    }

    score
}

fn score_social(features: &PageFeatures) -> u8 {
    let og = &features.open_graph;
    let mut score = 0;

    if og.title.is_some() && og.description.is_some() {
        score += 5;
    }
    if og.image.is_some() {
        score += 3;
    }
    if features.twitter.card.is_some() {
        score += 2;
    }

    score
}

fn score_mobile(features: &PageFeatures) -> u8 {
    let mut score = 0;

    if features.mobile.has_viewport {
        score += 7;
    }
    if features.mobile.has_responsive_images {
        score += 3;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeywordDensity;

    fn with_title(length: usize, focus: bool) -> PageFeatures {
        let mut features = PageFeatures::default();
        features.meta.title = Some("t".repeat(length));
        features.meta.title_length = length;
        features.focus.has_focus_in_title = focus;
        features
    }

    fn keywords(n: usize) -> Vec<KeywordDensity> {
        (0..n)
            .map(|i| KeywordDensity {
                word: format!("word{i}"),
                count: 1,
                density: 10.0,
            })
            .collect()
    }

    #[test]
    fn test_empty_page_scores_zero() {
        let breakdown = compute_score(&PageFeatures::default());
        assert_eq!(breakdown, ScoreBreakdown::default());
        assert_eq!(breakdown.total(), 0);
    }

    #[test]
    fn test_title_bucket() {
        assert_eq!(compute_score(&with_title(45, true)).title, 15);
        assert_eq!(compute_score(&with_title(45, false)).title, 12);
        assert_eq!(compute_score(&with_title(30, false)).title, 12);
        assert_eq!(compute_score(&with_title(60, false)).title, 12);
        assert_eq!(compute_score(&with_title(12, false)).title, 9);
        assert_eq!(compute_score(&with_title(70, false)).title, 9);
        assert_eq!(compute_score(&with_title(71, false)).title, 7);
    }

    #[test]
    fn test_meta_description_bucket() {
        let mut features = PageFeatures::default();
        features.meta.meta_description = Some("d".repeat(140));
        features.meta.meta_description_length = 140;
        features.focus.has_focus_in_meta = true;
        assert_eq!(compute_score(&features).meta_description, 15);

        features.meta.meta_description_length = 50;
        features.focus.has_focus_in_meta = false;
        assert_eq!(compute_score(&features).meta_description, 9);

        features.meta.meta_description_length = 200;
        assert_eq!(compute_score(&features).meta_description, 9);

        features.meta.meta_description_length = 49;
        assert_eq!(compute_score(&features).meta_description, 7);

        features.meta.meta_description_length = 201;
        assert_eq!(compute_score(&features).meta_description, 7);
    }

    #[test]
    fn test_headings_bucket() {
        let mut features = PageFeatures::default();
        features.headings.counts = [1, 2, 0, 0, 0, 0];
        features.headings.levels = vec![1, 2, 2];
        assert_eq!(compute_score(&features).headings, 15);

        features.headings.counts = [2, 1, 0, 0, 0, 0];
        assert_eq!(compute_score(&features).headings, 10);

        features.headings.counts = [3, 0, 0, 0, 0, 0];
        assert_eq!(compute_score(&features).headings, 3);

        // a single heading earns no hierarchy bonus
        features.headings.counts = [1, 0, 0, 0, 0, 0];
        features.headings.levels = vec![1];
        assert_eq!(compute_score(&features).headings, 10);
    }

    #[test]
    fn test_heading_skip_removes_hierarchy_bonus() {
        let mut features = PageFeatures::default();
        features.headings.counts = [1, 0, 1, 0, 0, 0];
        features.headings.levels = vec![1, 3];
        features.focus.has_heading_skip = true;
        assert_eq!(compute_score(&features).headings, 10);
    }

    #[test]
    fn test_content_bucket() {
        let mut features = PageFeatures::default();
        features.word_count = 250;
        assert_eq!(compute_score(&features).content, 5);

        features.word_count = 300;
        features.focus.keyword_density = keywords(5);
        assert_eq!(compute_score(&features).content, 15);

        features.word_count = 149;
        features.focus.keyword_density = keywords(4);
        assert_eq!(compute_score(&features).content, 0);
    }

    #[test]
    fn test_images_bucket() {
        let mut features = PageFeatures::default();
        features.images.total = 10;
        assert_eq!(compute_score(&features).images, 10);

        features.images.without_alt = 1;
        features.images.oversized = 2;
        assert_eq!(compute_score(&features).images, 3 + 2 + 1);

        features.images.without_alt = 2;
        features.images.oversized = 3;
        assert_eq!(compute_score(&features).images, 3);

        features.images.total = 3;
        features.images.without_alt = 1;
        features.images.oversized = 0;
        assert_eq!(compute_score(&features).images, 3 + 3);
    }

    #[test]
    fn test_technical_social_mobile_buckets() {
        let mut features = PageFeatures::default();
        features.technical.has_https = true;
        features.meta.canonical_url = Some("https://example.com/".to_string());
        features.structured_data.has_schema = true;
        features.meta.meta_robots = Some("index, follow".to_string());
        features.open_graph.title = Some("OG".to_string());
        features.open_graph.description = Some("OG description".to_string());
        features.twitter.card = Some("summary".to_string());
        features.mobile.has_viewport = true;

        let breakdown = compute_score(&features);
        assert_eq!(breakdown.technical, 10);
        assert_eq!(breakdown.social, 7);
        assert_eq!(breakdown.mobile, 7);

        features.open_graph.description = None;
        features.open_graph.image = Some("https://example.com/og.png".to_string());
        features.mobile.has_responsive_images = true;
        let breakdown = compute_score(&features);
        assert_eq!(breakdown.social, 5);
        assert_eq!(breakdown.mobile, 10);
    }

    #[test]
    fn test_total_matches_bucket_sum() {
        let mut features = with_title(45, true);
        features.word_count = 500;
        features.technical.has_https = true;
        features.images.total = 4;
        features.mobile.has_viewport = true;

        let breakdown = compute_score(&features);
        let sum: u32 = breakdown
            .buckets()
            .iter()
            .map(|(_, points, _)| u32::from(*points))
            .sum();
        assert_eq!(u32::from(breakdown.total()), sum);
        assert!(breakdown.total() <= 100);
        for (label, points, max) in breakdown.buckets() {
            assert!(points <= max, "{label} exceeded its maximum");
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let features = with_title(50, true);
        assert_eq!(compute_score(&features), compute_score(&features));
    }
}
