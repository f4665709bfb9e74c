use anyhow::{Result, anyhow};
use url::{ParseError, Url};

/// Where a link points relative to the page it appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
    /// Fragments, mailto:, tel:, javascript: and the like
    Other,
}

/// Parse user input as an absolute http(s) URL
pub fn parse_page_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim()).map_err(|e| anyhow!("invalid URL {input:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(anyhow!("URL {input:?} has no host")),
        scheme => Err(anyhow!("unsupported URL scheme {scheme:?}, expected http or https")),
    }
}

/// Classify an href by comparing its host with the page's host
///
/// Root-relative and path-relative hrefs are internal. Absolute and
/// protocol-relative hrefs are internal only when the host matches exactly,
/// ignoring a leading `www.`.
pub fn classify_link(href: &str, page_url: &Url) -> LinkKind {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return LinkKind::Other;
    }

    if href.starts_with("//") {
        return match Url::parse(&format!("{}:{}", page_url.scheme(), href)) {
            Ok(url) => host_kind(&url, page_url),
            Err(_) => LinkKind::Other,
        };
    }

    match Url::parse(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => host_kind(&url, page_url),
        Ok(_) => LinkKind::Other,
        Err(ParseError::RelativeUrlWithoutBase) => LinkKind::Internal,
        Err(_) => LinkKind::Other,
    }
}

fn host_kind(url: &Url, page_url: &Url) -> LinkKind {
    match (url.host_str(), page_url.host_str()) {
        (Some(host), Some(page_host)) if same_host(host, page_host) => LinkKind::Internal,
        _ => LinkKind::External,
    }
}

/// Host equality, case-insensitive and ignoring a leading `www.`
pub fn same_host(a: &str, b: &str) -> bool {
    fn strip(host: &str) -> &str {
        host.strip_prefix("www.").unwrap_or(host)
    }
    strip(&a.to_ascii_lowercase()).eq_ignore_ascii_case(strip(&b.to_ascii_lowercase()))
}

/// Resolve a resource reference against the page URL, keeping http(s) only
pub fn resolve_resource(reference: &str, page_url: &Url) -> Option<Url> {
    let resolved = page_url.join(reference.trim()).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// Whether a reference is loaded over plain HTTP
pub fn is_insecure_reference(reference: &str) -> bool {
    reference
        .trim()
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http://"))
}
