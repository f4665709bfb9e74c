//! # seoscope-core
//!
//! Core library for on-page SEO analysis.
//!
//! This library provides:
//! - Page feature extraction from HTML (meta, social tags, headings, images,
//!   links, JSON-LD, technical and mobile signals)
//! - Focus keyword and heading hierarchy analysis
//! - A weighted 0-100 score split into eight buckets
//! - A prioritized list of improvement recommendations
//!
//! The scoring and recommendation engines are pure functions over
//! [`PageFeatures`] and never fail.
//!
//! ## Features
//!
//! - `default`: Extraction and scoring from HTML you already have
//! - `fetch`: Fetch pages over HTTP and probe image sizes
//!
//! ## Example
//!
//! ```no_run
//! use seoscope_core::analyze_html;
//! use url::Url;
//!
//! # fn example() -> anyhow::Result<()> {
//! let html = r#"<html><head><title>Hello</title></head><body><h1>Hi</h1></body></html>"#;
//! let url = Url::parse("https://example.com/")?;
//!
//! let analysis = analyze_html(html, &url)?;
//! println!("score: {}", analysis.seo_score);
//! for rec in &analysis.recommendations {
//!     println!("[{}] {}", rec.impact, rec.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod extract;
pub mod focus;
pub mod parser;
pub mod recommendations;
pub mod scoring;
pub mod types;
pub mod url_utils;

#[cfg(feature = "fetch")]
pub mod probe;

// Re-export commonly used types
pub use types::{
    Category, FocusAnalysis, Impact, KeywordDensity, PageFeatures, Recommendation,
    RecommendationType, ScoreBreakdown,
};

pub use analysis::{SeoAnalysis, analyze_html};
pub use config::AnalyzerConfig;
pub use extract::{OversizedImages, extract_features};
pub use focus::{FocusInput, analyze_focus_and_hierarchy};
pub use recommendations::compute_recommendations;
pub use scoring::compute_score;

#[cfg(feature = "fetch")]
pub use analysis::analyze_url;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_features_score_zero() {
        let features = PageFeatures::default();
        let breakdown = compute_score(&features);

        assert_eq!(breakdown.total(), 0);
        assert_eq!(breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn test_empty_features_recommendations() {
        let recs = compute_recommendations(&PageFeatures::default());
        let errors = recs
            .iter()
            .filter(|rec| rec.kind == RecommendationType::Error)
            .count();

        assert!(errors >= 5);
        assert_eq!(recs[0].impact, Impact::High);
    }

    #[test]
    fn test_focus_input_defaults() {
        let focus = analyze_focus_and_hierarchy(&FocusInput::default());

        assert_eq!(focus, FocusAnalysis::default());
    }

    #[test]
    fn test_analyze_html_end_to_end() {
        let html = r#"
            <html>
                <head><title>A page</title></head>
                <body><h1>Heading</h1></body>
            </html>
        "#;
        let url = url::Url::parse("https://example.com/").unwrap();

        let analysis = analyze_html(html, &url).unwrap();
        assert!(analysis.seo_score > 0);
        assert!(analysis.seo_score <= 100);
        assert!(!analysis.recommendations.is_empty());
    }
}
