//! Common types used across seoscope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Value written in place of an absent textual field when serialized
pub const MISSING: &str = "Missing";

/// Serializes `None` as the `"Missing"` sentinel and reads it back as `None`.
pub(crate) mod missing_sentinel {
    use super::MISSING;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(MISSING))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|value| !value.is_empty() && value != MISSING))
    }
}

/// Everything the scoring and recommendation engines know about a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFeatures {
    /// Final URL after redirects
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    #[serde(flatten)]
    pub meta: MetaTags,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub headings: Headings,
    pub word_count: usize,
    pub images: Images,
    pub links: Links,
    pub structured_data: StructuredData,
    pub technical: Technical,
    pub mobile: Mobile,
    #[serde(flatten)]
    pub focus: FocusAnalysis,
}

/// Document-level meta tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTags {
    #[serde(default, with = "missing_sentinel")]
    pub title: Option<String>,
    pub title_length: usize,
    #[serde(default, with = "missing_sentinel")]
    pub meta_description: Option<String>,
    pub meta_description_length: usize,
    #[serde(default, with = "missing_sentinel")]
    pub meta_keywords: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub meta_robots: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub canonical_url: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub viewport: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub charset: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub html_lang: Option<String>,
    pub alternate_languages: Vec<AlternateLanguage>,
}

/// A `link rel="alternate" hreflang` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateLanguage {
    pub lang: String,
    pub url: String,
}

/// Open Graph (`og:*`) properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(default, with = "missing_sentinel")]
    pub title: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub description: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub image: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub url: Option<String>,
    #[serde(rename = "type", default, with = "missing_sentinel")]
    pub kind: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub site_name: Option<String>,
}

/// Twitter card (`twitter:*`) properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterCard {
    #[serde(default, with = "missing_sentinel")]
    pub card: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub title: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub description: Option<String>,
    #[serde(default, with = "missing_sentinel")]
    pub image: Option<String>,
}

/// Heading counts and their document-order sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headings {
    /// Count per level, index 0 is `<h1>`
    pub counts: [usize; 6],
    /// Heading levels (1-6) in document order
    pub levels: Vec<u8>,
    pub h1_texts: Vec<String>,
}

impl Headings {
    /// Number of headings at `level` (1-6); anything else counts as zero
    pub fn count(&self, level: u8) -> usize {
        match level {
            1..=6 => self.counts[usize::from(level - 1)],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub loading: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Images {
    pub items: Vec<ImageInfo>,
    pub total: usize,
    /// `alt` absent or empty
    pub without_alt: usize,
    pub with_lazy_load: usize,
    /// Larger than the oversized threshold according to a HEAD probe
    pub oversized: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    pub href: String,
    pub text: String,
    pub title: Option<String>,
    pub rel: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Links {
    pub items: Vec<LinkInfo>,
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    pub nofollow: usize,
    /// Empty or `#` hrefs
    pub broken: usize,
}

/// Parsed JSON-LD blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredData {
    pub items: Vec<JsonValue>,
    pub has_schema: bool,
    /// Distinct `@type` values in order of first appearance
    pub schema_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technical {
    pub has_https: bool,
    pub mixed_content: bool,
    pub inline_styles: usize,
    pub external_css: usize,
    pub external_js: usize,
    pub inline_js: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mobile {
    pub has_viewport: bool,
    pub has_responsive_images: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub word: String,
    pub count: usize,
    /// Percentage of qualifying tokens, two decimals
    pub density: f64,
}

/// Output of the focus keyword and heading hierarchy analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAnalysis {
    pub keyword_density: Vec<KeywordDensity>,
    /// Empty when the page has no qualifying words
    pub focus_keyword: String,
    pub has_focus_in_title: bool,
    pub has_focus_in_meta: bool,
    pub has_heading_skip: bool,
}

/// Points per scoring bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub title: u8,
    pub meta_description: u8,
    pub headings: u8,
    pub content: u8,
    pub images: u8,
    pub technical: u8,
    pub social: u8,
    pub mobile: u8,
}

impl ScoreBreakdown {
    pub const MAX_TOTAL: u8 = 100;

    /// Sum of all buckets, capped at 100
    pub fn total(&self) -> u8 {
        let sum: u32 = self.buckets().iter().map(|(_, points, _)| u32::from(*points)).sum();
        sum.min(u32::from(Self::MAX_TOTAL)) as u8
    }

    /// `(label, points, maximum)` for every bucket, in display order
    pub fn buckets(&self) -> [(&'static str, u8, u8); 8] {
        [
            ("Title", self.title, 15),
            ("Meta Description", self.meta_description, 15),
            ("Headings", self.headings, 15),
            ("Content", self.content, 15),
            ("Images", self.images, 10),
            ("Technical", self.technical, 10),
            ("Social", self.social, 10),
            ("Mobile", self.mobile, 10),
        ]
    }
}

/// A single improvement suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub category: Category,
    pub text: String,
    pub impact: Impact,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationType,
        category: Category,
        impact: Impact,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            text: text.into(),
            impact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Error,
    Warning,
    Info,
}

/// Ordered by severity: `High < Medium < Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Title,
    MetaDescription,
    Headings,
    Content,
    Images,
    Technical,
    Social,
    Mobile,
    Links,
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecommendationType::Error => "error",
            RecommendationType::Warning => "warning",
            RecommendationType::Info => "info",
        })
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Title => "Title",
            Category::MetaDescription => "Meta Description",
            Category::Headings => "Headings",
            Category::Content => "Content",
            Category::Images => "Images",
            Category::Technical => "Technical",
            Category::Social => "Social",
            Category::Mobile => "Mobile",
            Category::Links => "Links",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_serialize_as_sentinel() {
        let meta = MetaTags::default();
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["title"], "Missing");
        assert_eq!(json["metaDescription"], "Missing");
        assert_eq!(json["titleLength"], 0);
    }

    #[test]
    fn test_sentinel_deserializes_as_none() {
        let og: OpenGraph =
            serde_json::from_str(r#"{"title": "Missing", "description": "Hello", "type": "website"}"#)
                .unwrap();

        assert!(og.title.is_none());
        assert_eq!(og.description.as_deref(), Some("Hello"));
        assert_eq!(og.kind.as_deref(), Some("website"));
        assert!(og.image.is_none());
    }

    #[test]
    fn test_heading_count_by_level() {
        let headings = Headings {
            counts: [1, 3, 0, 2, 0, 0],
            levels: vec![1, 2, 2, 4, 2, 4],
            h1_texts: vec!["Hello".to_string()],
        };

        assert_eq!(headings.count(1), 1);
        assert_eq!(headings.count(2), 3);
        assert_eq!(headings.count(4), 2);
        assert_eq!(headings.count(0), 0);
        assert_eq!(headings.count(7), 0);
        assert_eq!(headings.total(), 6);
    }

    #[test]
    fn test_score_total_is_capped() {
        let breakdown = ScoreBreakdown {
            title: 60,
            meta_description: 60,
            ..Default::default()
        };
        assert_eq!(breakdown.total(), 100);
    }

    #[test]
    fn test_impact_ordering() {
        assert!(Impact::High < Impact::Medium);
        assert!(Impact::Medium < Impact::Low);
    }

    #[test]
    fn test_recommendation_serialization() {
        let rec = Recommendation::new(
            RecommendationType::Error,
            Category::MetaDescription,
            Impact::High,
            "Add a meta description",
        );
        let json = serde_json::to_value(&rec).unwrap();

        assert_eq!(json["type"], "error");
        assert_eq!(json["category"], "metaDescription");
        assert_eq!(json["impact"], "high");
        assert_eq!(json["text"], "Add a meta description");
    }
}
