//! Plain-text rendering of an analysis

use std::fmt::Write as FmtWrite;

use seoscope_core::types::MISSING;
use seoscope_core::{Impact, RecommendationType, SeoAnalysis};

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 18;
const BAR_WIDTH: usize = 20;

/// Render the full text report
pub fn render(analysis: &SeoAnalysis) -> String {
    let mut output = String::new();

    render_overview(&mut output, analysis);
    render_meta(&mut output, analysis);
    render_social(&mut output, analysis);
    render_headings(&mut output, analysis);
    render_content(&mut output, analysis);
    render_images(&mut output, analysis);
    render_links(&mut output, analysis);
    render_technical(&mut output, analysis);
    render_mobile(&mut output, analysis);
    render_recommendations(&mut output, analysis);

    output
}

/// Label for a score, using the same bands as the score colours
pub fn grade(score: u8) -> &'static str {
    match score {
        80.. => "Good",
        60..=79 => "Needs work",
        _ => "Poor",
    }
}

fn render_overview(buf: &mut String, analysis: &SeoAnalysis) {
    let features = &analysis.features;

    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "# SEO report for {}", features.url);
    let _ = writeln!(buf, "{DIVIDER}\n");
    let _ = writeln!(
        buf,
        "**SEO Score**: {}/100 ({})",
        analysis.seo_score,
        grade(analysis.seo_score)
    );
    let _ = writeln!(
        buf,
        "**Analyzed**: {}\n",
        features.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    push_section_header(buf, "📊", "Score Breakdown");
    for (label, points, max) in analysis.score_breakdown.buckets() {
        let _ = writeln!(
            buf,
            "• {:<width$} : {} {:>2}/{}",
            label,
            score_bar(points, max),
            points,
            max,
            width = LABEL_WIDTH
        );
    }
    let _ = writeln!(buf);

    push_key_value(buf, "Words", &features.word_count.to_string());
    push_key_value(buf, "Images", &features.images.total.to_string());
    push_key_value(buf, "Links", &features.links.total.to_string());
    push_key_value(buf, "H1 Tags", &features.headings.count(1).to_string());
    let _ = writeln!(buf);
}

fn render_meta(buf: &mut String, analysis: &SeoAnalysis) {
    let meta = &analysis.features.meta;

    push_section_header(buf, "🏷️", "Meta Tags");
    push_key_value(buf, "Title", &or_missing(meta.title.as_deref()));
    push_key_value(
        buf,
        "Title Length",
        &format!("{} characters (recommended 30-60)", meta.title_length),
    );
    push_key_value(
        buf,
        "Description",
        &or_missing(meta.meta_description.as_deref()),
    );
    push_key_value(
        buf,
        "Description Length",
        &format!(
            "{} characters (recommended 120-160)",
            meta.meta_description_length
        ),
    );
    push_key_value(buf, "Keywords", &or_missing(meta.meta_keywords.as_deref()));
    push_key_value(buf, "Robots", &or_missing(meta.meta_robots.as_deref()));
    push_key_value(buf, "Canonical", &or_missing(meta.canonical_url.as_deref()));
    push_key_value(buf, "Charset", &or_missing(meta.charset.as_deref()));
    push_key_value(buf, "Language", &or_missing(meta.html_lang.as_deref()));
    let _ = writeln!(buf);
}

fn render_social(buf: &mut String, analysis: &SeoAnalysis) {
    let og = &analysis.features.open_graph;
    let twitter = &analysis.features.twitter;

    push_section_header(buf, "💬", "Social");
    push_key_value(buf, "og:title", &or_missing(og.title.as_deref()));
    push_key_value(buf, "og:description", &or_missing(og.description.as_deref()));
    push_key_value(buf, "og:image", &or_missing(og.image.as_deref()));
    push_key_value(buf, "og:url", &or_missing(og.url.as_deref()));
    push_key_value(buf, "og:type", &or_missing(og.kind.as_deref()));
    push_key_value(buf, "og:site_name", &or_missing(og.site_name.as_deref()));
    push_key_value(buf, "twitter:card", &or_missing(twitter.card.as_deref()));
    push_key_value(buf, "twitter:title", &or_missing(twitter.title.as_deref()));
    push_key_value(
        buf,
        "twitter:description",
        &or_missing(twitter.description.as_deref()),
    );
    push_key_value(buf, "twitter:image", &or_missing(twitter.image.as_deref()));
    let _ = writeln!(buf);
}

fn render_headings(buf: &mut String, analysis: &SeoAnalysis) {
    let features = &analysis.features;
    let headings = &features.headings;

    push_section_header(buf, "🔠", "Headings");
    for level in 1..=6u8 {
        push_key_value(buf, &format!("H{level}"), &headings.count(level).to_string());
    }
    for text in &headings.h1_texts {
        push_key_value(buf, "H1 Text", text);
    }
    push_key_value(
        buf,
        "Hierarchy",
        if features.focus.has_heading_skip {
            "skips levels"
        } else {
            "sequential"
        },
    );
    let _ = writeln!(buf);
}

fn render_content(buf: &mut String, analysis: &SeoAnalysis) {
    let features = &analysis.features;
    let focus = &features.focus;

    push_section_header(buf, "📝", "Content");
    push_key_value(buf, "Word Count", &features.word_count.to_string());
    if !focus.focus_keyword.is_empty() {
        push_key_value(buf, "Focus Keyword", &focus.focus_keyword);
        push_key_value(buf, "In Title", yes_no(focus.has_focus_in_title));
        push_key_value(buf, "In Description", yes_no(focus.has_focus_in_meta));
    }

    if !focus.keyword_density.is_empty() {
        let _ = writeln!(buf, "\n| Keyword | Count | Density |");
        let _ = writeln!(buf, "|---|---|---|");
        for entry in &focus.keyword_density {
            let _ = writeln!(
                buf,
                "| {} | {} | {:.2}% |",
                entry.word, entry.count, entry.density
            );
        }
    }
    let _ = writeln!(buf);
}

fn render_images(buf: &mut String, analysis: &SeoAnalysis) {
    let images = &analysis.features.images;

    push_section_header(buf, "🖼️", "Images");
    push_key_value(buf, "Total", &images.total.to_string());
    push_key_value(buf, "Missing Alt", &images.without_alt.to_string());
    push_key_value(buf, "Lazy Loaded", &images.with_lazy_load.to_string());
    push_key_value(buf, "Oversized", &images.oversized.to_string());
    let _ = writeln!(buf);
}

fn render_links(buf: &mut String, analysis: &SeoAnalysis) {
    let links = &analysis.features.links;

    push_section_header(buf, "🔗", "Links");
    push_key_value(buf, "Total", &links.total.to_string());
    push_key_value(buf, "Internal", &links.internal.to_string());
    push_key_value(buf, "External", &links.external.to_string());
    push_key_value(buf, "Nofollow", &links.nofollow.to_string());
    push_key_value(buf, "Broken", &links.broken.to_string());
    let _ = writeln!(buf);
}

fn render_technical(buf: &mut String, analysis: &SeoAnalysis) {
    let technical = &analysis.features.technical;
    let data = &analysis.features.structured_data;

    push_section_header(buf, "⚙️", "Technical");
    push_key_value(buf, "HTTPS", yes_no(technical.has_https));
    push_key_value(buf, "Mixed Content", yes_no(technical.mixed_content));
    push_key_value(buf, "Inline Styles", &technical.inline_styles.to_string());
    push_key_value(buf, "External CSS", &technical.external_css.to_string());
    push_key_value(buf, "External JS", &technical.external_js.to_string());
    push_key_value(buf, "Inline JS", &technical.inline_js.to_string());
    push_key_value(buf, "Structured Data", yes_no(data.has_schema));
    push_key_value(buf, "Schema Types", &data.schema_types.join(", "));
    let _ = writeln!(buf);
}

fn render_mobile(buf: &mut String, analysis: &SeoAnalysis) {
    let features = &analysis.features;

    push_section_header(buf, "📱", "Mobile & International");
    push_key_value(buf, "Viewport", &or_missing(features.meta.viewport.as_deref()));
    push_key_value(
        buf,
        "Responsive Images",
        yes_no(features.mobile.has_responsive_images),
    );
    for alternate in &features.meta.alternate_languages {
        push_key_value(buf, &format!("hreflang {}", alternate.lang), &alternate.url);
    }
    let _ = writeln!(buf);
}

fn render_recommendations(buf: &mut String, analysis: &SeoAnalysis) {
    push_section_header(
        buf,
        "✅",
        &format!("Recommendations ({})", analysis.recommendations.len()),
    );

    if analysis.recommendations.is_empty() {
        let _ = writeln!(buf, "Nothing to fix - nice work.");
        return;
    }

    for rec in &analysis.recommendations {
        let _ = writeln!(
            buf,
            "{} [{} impact] {}: {}",
            type_icon(rec.kind),
            rec.impact,
            rec.category,
            rec.text
        );
    }

    let high = analysis
        .recommendations
        .iter()
        .filter(|rec| rec.impact == Impact::High)
        .count();
    if high > 0 {
        let _ = writeln!(buf, "\n{high} high-impact issues should be fixed first.");
    }
}

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

fn score_bar(points: u8, max: u8) -> String {
    let filled = if max == 0 {
        0
    } else {
        (usize::from(points) * BAR_WIDTH / usize::from(max)).min(BAR_WIDTH)
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn type_icon(kind: RecommendationType) -> &'static str {
    match kind {
        RecommendationType::Error => "⚠️",
        RecommendationType::Warning => "⚡",
        RecommendationType::Info => "ℹ️",
    }
}

fn or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
