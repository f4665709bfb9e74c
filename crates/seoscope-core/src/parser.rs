//! HTML fetching and parsing functionality

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value as JsonValue;

#[cfg(feature = "fetch")]
use anyhow::Context;
#[cfg(feature = "fetch")]
use chrono::{DateTime, Utc};
#[cfg(feature = "fetch")]
use url::Url;

#[cfg(feature = "fetch")]
use crate::config::AnalyzerConfig;

/// A page as it came off the wire
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: Url,
    pub html: String,
    pub fetched_at: DateTime<Utc>,
}

/// Build the HTTP client used for the page fetch and image probes
///
/// Requires the `fetch` feature (needs reqwest)
#[cfg(feature = "fetch")]
pub fn build_client(config: &AnalyzerConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout())
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .context("Failed to create HTTP client")
}

/// Fetch HTML content from a URL, following redirects
///
/// Requires the `fetch` feature (needs reqwest)
#[cfg(feature = "fetch")]
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<FetchedPage> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("non-success status from {}", url))?;

    let final_url = response.url().clone();
    if final_url != *url {
        log::debug!("{} redirected to {}", url, final_url);
    }

    let html = response
        .text()
        .await
        .with_context(|| format!("failed to read response body from {}", final_url))?;

    Ok(FetchedPage {
        final_url,
        html,
        fetched_at: Utc::now(),
    })
}

/// Extract JSON-LD script blocks from HTML
pub fn extract_json_ld_blocks(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    extract_json_ld_from_document(&document)
}

pub(crate) fn extract_json_ld_from_document(document: &Html) -> Result<Vec<String>> {
    let script_selector = Selector::parse("script")
        .map_err(|e| anyhow::anyhow!("unable to parse selector: {}", e))?;

    Ok(document
        .select(&script_selector)
        .filter(|element| is_json_ld_script(element.value().attr("type")))
        .filter_map(|element| {
            let text = element.text().collect::<String>().trim().to_string();
            if text.is_empty() { None } else { Some(text) }
        })
        .collect())
}

/// Whether a script `type` attribute marks JSON-LD
///
/// Uses contains() to catch variations like "application/ld+json; charset=utf-8"
pub(crate) fn is_json_ld_script(script_type: Option<&str>) -> bool {
    script_type
        .map(|t| t.trim().to_ascii_lowercase().contains("ld+json"))
        .unwrap_or(false)
}

/// Parse JSON-LD blocks, dropping any that are not valid JSON
pub fn parse_json_ld_blocks(blocks: &[String]) -> Vec<JsonValue> {
    blocks
        .iter()
        .filter_map(|block| match serde_json::from_str::<JsonValue>(block) {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("dropping malformed JSON-LD block: {}", e);
                None
            }
        })
        .collect()
}

/// Distinct `@type` values in order of first appearance
///
/// Looks at top-level objects, top-level arrays and `@graph` members.
pub fn schema_types(items: &[JsonValue]) -> Vec<String> {
    let mut types = Vec::new();
    for item in items {
        collect_types(item, &mut types);
    }
    types
}

fn collect_types(value: &JsonValue, types: &mut Vec<String>) {
    match value {
        JsonValue::Array(arr) => {
            for item in arr {
                collect_types(item, types);
            }
        }
        JsonValue::Object(obj) => {
            match obj.get("@type") {
                Some(JsonValue::String(s)) => push_unique(types, s),
                Some(JsonValue::Array(arr)) => {
                    for s in arr.iter().filter_map(|t| t.as_str()) {
                        push_unique(types, s);
                    }
                }
                _ => {}
            }
            if let Some(graph) = obj.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

fn push_unique(types: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !types.iter().any(|t| t == value) {
        types.push(value.to_string());
    }
}

/// Sanitize HTML by removing script, style, and other unwanted elements
pub fn sanitize_html(html: &str) -> String {
    static RE_TAG_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?is)<script[^>]*?>[\s\S]*?</script>",
            r"(?is)<style[^>]*?>[\s\S]*?</style>",
            r"(?is)<noscript[^>]*?>[\s\S]*?</noscript>",
            r"(?is)<template[^>]*?>[\s\S]*?</template>",
        ]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("invalid block regex"))
        .collect()
    });
    static RE_COMMENT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)<!--.*?-->").expect("invalid comment regex"));

    let mut clean = html.to_string();
    for re in RE_TAG_BLOCKS.iter() {
        clean = re.replace_all(&clean, "").into_owned();
    }

    RE_COMMENT.replace_all(&clean, "").into_owned()
}

/// Visible body text with scripts, styles and comments removed
pub fn body_text(html: &str) -> String {
    let document = Html::parse_document(&sanitize_html(html));
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    document
        .select(&body_selector)
        .flat_map(|body| body.text())
        .collect::<Vec<_>>()
        .join(" ")
}
