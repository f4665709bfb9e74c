//! Rule-based improvement recommendations
//!
//! Every rule is evaluated independently against [`PageFeatures`]. The
//! resulting list is ordered by impact (high first); recommendations with
//! the same impact keep the order the rules below produce them in.

use crate::scoring::{CONTENT_FULL_WORDS, META_IDEAL, TITLE_IDEAL};
use crate::types::{
    Category, Impact, PageFeatures, Recommendation, RecommendationType as Kind,
};

/// Pages with more images than this should lazy-load some of them
pub const LAZY_LOAD_IMAGE_THRESHOLD: usize = 5;

/// Build the ordered recommendation list for a page
pub fn compute_recommendations(features: &PageFeatures) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    title_rules(features, &mut recommendations);
    meta_description_rules(features, &mut recommendations);
    heading_rules(features, &mut recommendations);
    content_rules(features, &mut recommendations);
    image_rules(features, &mut recommendations);
    technical_rules(features, &mut recommendations);
    social_rules(features, &mut recommendations);
    mobile_rules(features, &mut recommendations);
    link_rules(features, &mut recommendations);

    // Stable: equal impacts keep generation order
    recommendations.sort_by_key(|rec| rec.impact);
    recommendations
}

fn title_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    let meta = &features.meta;
    let focus = &features.focus;

    if meta.title.is_none() {
        out.push(Recommendation::new(
            Kind::Error,
            Category::Title,
            Impact::High,
            "Add a title tag to your page",
        ));
    } else if meta.title_length < TITLE_IDEAL.0 {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Title,
            Impact::Medium,
            format!(
                "Title is too short ({} characters) - aim for {}-{} characters",
                meta.title_length, TITLE_IDEAL.0, TITLE_IDEAL.1
            ),
        ));
    } else if meta.title_length > TITLE_IDEAL.1 {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Title,
            Impact::Medium,
            format!(
                "Title is too long ({} characters) - aim for {}-{} characters",
                meta.title_length, TITLE_IDEAL.0, TITLE_IDEAL.1
            ),
        ));
    }

    if !focus.focus_keyword.is_empty() && !focus.has_focus_in_title {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Title,
            Impact::Medium,
            format!(
                "Include your focus keyword \"{}\" in the title",
                focus.focus_keyword
            ),
        ));
    }
}

fn meta_description_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    let meta = &features.meta;
    let focus = &features.focus;

    if meta.meta_description.is_none() {
        out.push(Recommendation::new(
            Kind::Error,
            Category::MetaDescription,
            Impact::High,
            "Add a meta description",
        ));
        return;
    }

    if meta.meta_description_length < META_IDEAL.0 {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::MetaDescription,
            Impact::Medium,
            format!(
                "Meta description is too short ({} characters) - aim for {}-{} characters",
                meta.meta_description_length, META_IDEAL.0, META_IDEAL.1
            ),
        ));
    } else if meta.meta_description_length > META_IDEAL.1 {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::MetaDescription,
            Impact::Medium,
            format!(
                "Meta description is too long ({} characters) - aim for {}-{} characters",
                meta.meta_description_length, META_IDEAL.0, META_IDEAL.1
            ),
        ));
    }

    if !focus.focus_keyword.is_empty() && !focus.has_focus_in_meta {
        out.push(Recommendation::new(
            Kind::Info,
            Category::MetaDescription,
            Impact::Medium,
            format!(
                "Include your focus keyword \"{}\" in the meta description",
                focus.focus_keyword
            ),
        ));
    }
}

fn heading_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    let headings = &features.headings;
    let h1_count = headings.count(1);

    if h1_count == 0 {
        out.push(Recommendation::new(
            Kind::Error,
            Category::Headings,
            Impact::High,
            "Add an H1 tag to your page",
        ));
    } else if h1_count > 1 {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Headings,
            Impact::Medium,
            format!("Use only one H1 tag per page (found {h1_count})"),
        ));
    }

    if features.focus.has_heading_skip {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Headings,
            Impact::Medium,
            "Heading levels are skipped - keep the hierarchy sequential (e.g. H2 before H3)",
        ));
    }

    if headings.count(2) == 0 {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Headings,
            Impact::Low,
            "Add H2 subheadings to structure your content",
        ));
    }
}

fn content_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    if features.word_count < CONTENT_FULL_WORDS {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Content,
            Impact::High,
            format!(
                "Page has only {} words - add more content ({}+ words recommended)",
                features.word_count, CONTENT_FULL_WORDS
            ),
        ));
    }
}

fn image_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    let images = &features.images;

    if images.without_alt > 0 {
        out.push(Recommendation::new(
            Kind::Error,
            Category::Images,
            Impact::Medium,
            format!("{} images missing alt text", images.without_alt),
        ));
    }

    if images.oversized > 0 {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Images,
            Impact::Medium,
            format!(
                "{} images are oversized - compress or resize them",
                images.oversized
            ),
        ));
    }

    if images.total > LAZY_LOAD_IMAGE_THRESHOLD && images.with_lazy_load == 0 {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Images,
            Impact::Low,
            "Add loading=\"lazy\" to images below the fold",
        ));
    }
}

fn technical_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    if !features.technical.has_https {
        out.push(Recommendation::new(
            Kind::Error,
            Category::Technical,
            Impact::High,
            "Serve the page over HTTPS",
        ));
    }

    if features.meta.canonical_url.is_none() {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Technical,
            Impact::Medium,
            "Add a canonical URL to avoid duplicate content",
        ));
    }

    if !features.structured_data.has_schema {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Technical,
            Impact::Medium,
            "Add structured data (JSON-LD) to describe the page",
        ));
    }

    if features.meta.html_lang.is_none() {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Technical,
            Impact::Medium,
            "Declare the page language with a lang attribute on <html>",
        ));
    }
}

fn social_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    let og = &features.open_graph;

    if og.title.is_none() || og.description.is_none() {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Social,
            Impact::Low,
            "Add Open Graph title and description tags for social sharing",
        ));
    }

    if og.image.is_none() {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Social,
            Impact::Low,
            "Add an Open Graph image for social previews",
        ));
    }
}

fn mobile_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    if !features.mobile.has_viewport {
        out.push(Recommendation::new(
            Kind::Error,
            Category::Mobile,
            Impact::High,
            "Add a viewport meta tag for mobile devices",
        ));
    }
}

fn link_rules(features: &PageFeatures, out: &mut Vec<Recommendation>) {
    let links = &features.links;

    if links.broken > 0 {
        out.push(Recommendation::new(
            Kind::Warning,
            Category::Links,
            Impact::Low,
            format!("{} links have an empty or \"#\" href", links.broken),
        ));
    }

    if links.external > 0 && links.nofollow == 0 {
        out.push(Recommendation::new(
            Kind::Info,
            Category::Links,
            Impact::Low,
            "Consider rel=\"nofollow\" on external links you don't vouch for",
        ));
    }
}
