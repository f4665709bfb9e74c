//! Page feature extraction
//!
//! Turns fetched HTML into an immutable [`PageFeatures`] value. Everything
//! network-related (the fetch itself, image size probes) happens before this
//! step; extraction only reads the document.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::focus::{FocusInput, analyze_focus_and_hierarchy};
use crate::parser::{self, extract_json_ld_from_document, is_json_ld_script};
use crate::types::{
    AlternateLanguage, Headings, ImageInfo, Images, LinkInfo, Links, MetaTags, Mobile, OpenGraph,
    PageFeatures, StructuredData, Technical, TwitterCard,
};
use crate::url_utils::{LinkKind, classify_link, is_insecure_reference};

/// Image `src` values whose probed size exceeded the oversized threshold
pub type OversizedImages = HashSet<String>;

/// Build the full feature record for a page
///
/// `oversized` comes from [`crate::probe`]; pass an empty set to skip it.
pub fn extract_features(
    html: &str,
    page_url: &Url,
    fetched_at: DateTime<Utc>,
    oversized: &OversizedImages,
) -> Result<PageFeatures> {
    let document = Html::parse_document(html);

    let meta = extract_meta(&document)?;
    let open_graph = extract_open_graph(&document)?;
    let twitter = extract_twitter(&document)?;
    let headings = extract_headings(&document)?;
    let images = extract_images(&document, oversized)?;
    let links = extract_links(&document, page_url)?;
    let structured_data = extract_structured_data(&document)?;
    let technical = extract_technical(&document, page_url, &images, &links)?;
    let mobile = Mobile {
        has_viewport: meta.viewport.is_some(),
        has_responsive_images: count(&document, "img[srcset], img[data-srcset]")? > 0,
    };

    let text = parser::body_text(html);
    let word_count = text.split_whitespace().count();
    let focus = analyze_focus_and_hierarchy(&FocusInput {
        body_text: &text,
        title: meta.title.as_deref(),
        meta_description: meta.meta_description.as_deref(),
        heading_levels: &headings.levels,
    });

    log::debug!(
        "extracted {}: {} words, {} headings, {} images, {} links, {} JSON-LD items",
        page_url,
        word_count,
        headings.total(),
        images.total,
        links.total,
        structured_data.items.len()
    );

    Ok(PageFeatures {
        url: page_url.to_string(),
        fetched_at,
        meta,
        open_graph,
        twitter,
        headings,
        word_count,
        images,
        links,
        structured_data,
        technical,
        mobile,
        focus,
    })
}

/// `src` attributes of all images in document order
pub fn image_sources(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let img_selector = selector("img[src]")?;

    Ok(document
        .select(&img_selector)
        .filter_map(|img| attr(&img, "src"))
        .collect())
}

fn extract_meta(document: &Html) -> Result<MetaTags> {
    let title = first_text(document, "title")?;
    let meta_description = meta_content(document, r#"meta[name="description" i]"#)?;

    let alternate_selector = selector(r#"link[rel~="alternate" i][hreflang]"#)?;
    let alternate_languages = document
        .select(&alternate_selector)
        .filter_map(|link| {
            Some(AlternateLanguage {
                lang: attr(&link, "hreflang")?,
                url: attr(&link, "href")?,
            })
        })
        .collect();

    Ok(MetaTags {
        title_length: char_len(title.as_deref()),
        meta_description_length: char_len(meta_description.as_deref()),
        title,
        meta_description,
        meta_keywords: meta_content(document, r#"meta[name="keywords" i]"#)?,
        meta_robots: meta_content(document, r#"meta[name="robots" i]"#)?,
        canonical_url: first_attr(document, r#"link[rel~="canonical" i]"#, "href")?,
        viewport: meta_content(document, r#"meta[name="viewport" i]"#)?,
        charset: extract_charset(document)?,
        html_lang: first_attr(document, "html", "lang")?,
        alternate_languages,
    })
}

fn extract_charset(document: &Html) -> Result<Option<String>> {
    if let Some(charset) = first_attr(document, "meta[charset]", "charset")? {
        return Ok(Some(charset));
    }

    // <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
    let content = meta_content(document, r#"meta[http-equiv="content-type" i]"#)?;
    Ok(content.and_then(|content| {
        let lower = content.to_ascii_lowercase();
        let start = lower.find("charset=")? + "charset=".len();
        let value = content[start..].trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then(|| value.to_string())
    }))
}

fn extract_open_graph(document: &Html) -> Result<OpenGraph> {
    Ok(OpenGraph {
        title: social_meta(document, "og:title")?,
        description: social_meta(document, "og:description")?,
        image: social_meta(document, "og:image")?,
        url: social_meta(document, "og:url")?,
        kind: social_meta(document, "og:type")?,
        site_name: social_meta(document, "og:site_name")?,
    })
}

fn extract_twitter(document: &Html) -> Result<TwitterCard> {
    Ok(TwitterCard {
        card: social_meta(document, "twitter:card")?,
        title: social_meta(document, "twitter:title")?,
        description: social_meta(document, "twitter:description")?,
        image: social_meta(document, "twitter:image")?,
    })
}

/// Social tags show up with either `property=` or `name=`
fn social_meta(document: &Html, key: &str) -> Result<Option<String>> {
    meta_content(
        document,
        &format!(r#"meta[property="{key}"], meta[name="{key}"]"#),
    )
}

fn extract_headings(document: &Html) -> Result<Headings> {
    let heading_selector = selector("h1, h2, h3, h4, h5, h6")?;
    let mut headings = Headings::default();

    for element in document.select(&heading_selector) {
        let Some(level) = element
            .value()
            .name()
            .strip_prefix('h')
            .and_then(|digit| digit.parse::<u8>().ok())
            .filter(|level| (1..=6).contains(level))
        else {
            continue;
        };

        headings.counts[usize::from(level - 1)] += 1;
        headings.levels.push(level);
        if level == 1 {
            headings.h1_texts.push(element_text(&element));
        }
    }

    Ok(headings)
}

fn extract_images(document: &Html, oversized: &OversizedImages) -> Result<Images> {
    let img_selector = selector("img")?;
    let items: Vec<ImageInfo> = document
        .select(&img_selector)
        .map(|img| ImageInfo {
            src: attr(&img, "src"),
            // alt="" is kept as Some("") so it still counts as missing below
            alt: img.value().attr("alt").map(|alt| alt.trim().to_string()),
            title: attr(&img, "title"),
            width: attr(&img, "width"),
            height: attr(&img, "height"),
            loading: attr(&img, "loading"),
        })
        .collect();

    let without_alt = items
        .iter()
        .filter(|img| img.alt.as_deref().is_none_or(str::is_empty))
        .count();
    let with_lazy_load = items
        .iter()
        .filter(|img| {
            img.loading
                .as_deref()
                .is_some_and(|loading| loading.eq_ignore_ascii_case("lazy"))
        })
        .count();
    let oversized_count = items
        .iter()
        .filter(|img| img.src.as_ref().is_some_and(|src| oversized.contains(src)))
        .count();

    Ok(Images {
        total: items.len(),
        without_alt,
        with_lazy_load,
        oversized: oversized_count,
        items,
    })
}

fn extract_links(document: &Html, page_url: &Url) -> Result<Links> {
    let link_selector = selector("a[href]")?;
    let items: Vec<LinkInfo> = document
        .select(&link_selector)
        .map(|a| LinkInfo {
            href: a.value().attr("href").unwrap_or_default().trim().to_string(),
            text: element_text(&a),
            title: attr(&a, "title"),
            rel: attr(&a, "rel"),
            target: attr(&a, "target"),
        })
        .collect();

    let mut links = Links {
        total: items.len(),
        ..Default::default()
    };
    for link in &items {
        match classify_link(&link.href, page_url) {
            LinkKind::Internal => links.internal += 1,
            LinkKind::External => links.external += 1,
            LinkKind::Other => {}
        }
        let is_nofollow = link.rel.as_deref().is_some_and(|rel| {
            rel.split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("nofollow"))
        });
        if is_nofollow {
            links.nofollow += 1;
        }
        if link.href.is_empty() || link.href == "#" {
            links.broken += 1;
        }
    }
    links.items = items;

    Ok(links)
}

fn extract_structured_data(document: &Html) -> Result<StructuredData> {
    let blocks = extract_json_ld_from_document(document)?;
    let items = parser::parse_json_ld_blocks(&blocks);
    let schema_types = parser::schema_types(&items);

    Ok(StructuredData {
        has_schema: !items.is_empty(),
        items,
        schema_types,
    })
}

fn extract_technical(
    document: &Html,
    page_url: &Url,
    images: &Images,
    links: &Links,
) -> Result<Technical> {
    let has_https = page_url.scheme() == "https";
    let mixed_content = has_https
        && (images
            .items
            .iter()
            .filter_map(|img| img.src.as_deref())
            .any(is_insecure_reference)
            || links
                .items
                .iter()
                .any(|link| is_insecure_reference(&link.href)));

    let script_selector = selector("script")?;
    let mut external_js = 0;
    let mut scripts_without_src = 0usize;
    let mut json_ld_without_src = 0usize;
    for script in document.select(&script_selector) {
        if script.value().attr("src").is_some() {
            external_js += 1;
            continue;
        }
        scripts_without_src += 1;
        if is_json_ld_script(script.value().attr("type")) {
            json_ld_without_src += 1;
        }
    }

    Ok(Technical {
        has_https,
        mixed_content,
        inline_styles: count(document, "[style]")?,
        external_css: count(document, r#"link[rel~="stylesheet" i]"#)?,
        external_js,
        inline_js: scripts_without_src.saturating_sub(json_ld_without_src),
    })
}

// Helper functions
fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("unable to parse selector {css:?}: {e}"))
}

fn count(document: &Html, css: &str) -> Result<usize> {
    Ok(document.select(&selector(css)?).count())
}

/// Trimmed, non-empty attribute value
fn attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_attr(document: &Html, css: &str, name: &str) -> Result<Option<String>> {
    let sel = selector(css)?;
    Ok(document.select(&sel).find_map(|element| attr(&element, name)))
}

fn meta_content(document: &Html, css: &str) -> Result<Option<String>> {
    first_attr(document, css, "content")
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .map(|element| element_text(&element))
        .filter(|text| !text.is_empty()))
}

/// Element text with runs of whitespace collapsed
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn char_len(value: Option<&str>) -> usize {
    value.map(|v| v.chars().count()).unwrap_or(0)
}
