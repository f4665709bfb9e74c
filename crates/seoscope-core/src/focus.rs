//! Focus keyword and heading hierarchy analysis
//!
//! Derives the keyword density table from body text, picks the most frequent
//! word as the page's focus keyword, and detects skipped heading levels.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::types::{FocusAnalysis, KeywordDensity};

/// Tokens must be longer than this many characters to count
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Size of the keyword density table
pub const MAX_KEYWORDS: usize = 10;

/// The slice of a page the focus analysis needs
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusInput<'a> {
    pub body_text: &'a str,
    pub title: Option<&'a str>,
    pub meta_description: Option<&'a str>,
    /// Heading levels in document order
    pub heading_levels: &'a [u8],
}

/// Compute keyword density, focus keyword and heading-skip flag
pub fn analyze_focus_and_hierarchy(input: &FocusInput<'_>) -> FocusAnalysis {
    let keyword_density = keyword_density(input.body_text);
    let focus_keyword = keyword_density
        .first()
        .map(|entry| entry.word.clone())
        .unwrap_or_default();

    FocusAnalysis {
        has_focus_in_title: contains_keyword(input.title, &focus_keyword),
        has_focus_in_meta: contains_keyword(input.meta_description, &focus_keyword),
        has_heading_skip: has_heading_skip(input.heading_levels),
        keyword_density,
        focus_keyword,
    }
}

/// Top keywords by descending count, ties kept in first-seen order
pub fn keyword_density(text: &str) -> Vec<KeywordDensity> {
    static RE_NON_WORD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^\w\s]").expect("invalid non-word regex"));

    let lowered = text.to_lowercase();
    let stripped = RE_NON_WORD.replace_all(&lowered, "");
    let tokens: Vec<&str> = stripped
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
        .collect();

    if tokens.is_empty() {
        return Vec::new();
    }

    let mut frequencies: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for &token in &tokens {
        match positions.get(token) {
            Some(&index) => frequencies[index].1 += 1,
            None => {
                positions.insert(token, frequencies.len());
                frequencies.push((token, 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));

    let total = tokens.len() as f64;
    frequencies
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, count)| KeywordDensity {
            word: word.to_string(),
            count,
            density: round_two_decimals(count as f64 / total * 100.0),
        })
        .collect()
}

/// True when two consecutive headings jump down more than one level
pub fn has_heading_skip(levels: &[u8]) -> bool {
    levels
        .windows(2)
        .any(|pair| i16::from(pair[1]) - i16::from(pair[0]) > 1)
}

/// Case-insensitive substring test; an empty keyword or absent field never matches
pub fn contains_keyword(field: Option<&str>, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    field.is_some_and(|value| value.to_lowercase().contains(&keyword.to_lowercase()))
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
