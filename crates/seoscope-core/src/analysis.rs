//! End-to-end page analysis
//!
//! Ties extraction, scoring and recommendations together into the
//! [`SeoAnalysis`] object handed to presentation layers.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extract::{OversizedImages, extract_features};
use crate::recommendations::compute_recommendations;
use crate::scoring::compute_score;
use crate::types::{PageFeatures, Recommendation, ScoreBreakdown};

#[cfg(feature = "fetch")]
use crate::config::AnalyzerConfig;

/// Full result of analyzing one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAnalysis {
    #[serde(flatten)]
    pub features: PageFeatures,
    pub seo_score: u8,
    pub score_breakdown: ScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
}

impl SeoAnalysis {
    /// Run the scoring and recommendation engines over extracted features
    pub fn from_features(features: PageFeatures) -> Self {
        let score_breakdown = compute_score(&features);
        let recommendations = compute_recommendations(&features);

        Self {
            seo_score: score_breakdown.total(),
            score_breakdown,
            recommendations,
            features,
        }
    }
}

/// Analyze HTML that is already in hand; image sizes are not probed
pub fn analyze_html(html: &str, page_url: &Url) -> Result<SeoAnalysis> {
    let features = extract_features(html, page_url, Utc::now(), &OversizedImages::new())?;
    Ok(SeoAnalysis::from_features(features))
}

/// Fetch a page, probe its images and analyze it
///
/// Requires the `fetch` feature (needs reqwest)
#[cfg(feature = "fetch")]
pub async fn analyze_url(url: &str, config: &AnalyzerConfig) -> Result<SeoAnalysis> {
    use crate::extract::image_sources;
    use crate::parser::{build_client, fetch_page};
    use crate::probe::probe_image_sizes;
    use crate::url_utils::parse_page_url;

    let url = parse_page_url(url)?;
    let client = build_client(config)?;

    log::info!("fetching {}", url);
    let page = fetch_page(&client, &url).await?;

    let oversized = if config.probe_images {
        let sources = image_sources(&page.html)?;
        probe_image_sizes(&client, &page.final_url, &sources, config).await
    } else {
        OversizedImages::new()
    };

    let features = extract_features(&page.html, &page.final_url, page.fetched_at, &oversized)?;
    let analysis = SeoAnalysis::from_features(features);
    log::info!(
        "analyzed {}: score {} with {} recommendations",
        page.final_url,
        analysis.seo_score,
        analysis.recommendations.len()
    );

    Ok(analysis)
}
