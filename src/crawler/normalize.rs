//! Domain-scoped link normalization
//!
//! Turns the raw `href` values of a page into canonical, absolute URLs that
//! belong to the crawled domain. The filter is lossy: anything it does not
//! recognize is dropped without an error.
//!
//! Canonical form is `https://<domain>/<path>` for root-relative links and the
//! link itself for absolute same-domain links, minus one trailing slash.
//! Query strings, fragments, percent-encoding and case are left untouched.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Absolute http(s) URL; captures the raw authority
static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?P<netloc>[^/?#]*)").expect("must compile URL pattern")
});

/// Authority of an absolute http(s) URL, exactly as written
fn netloc(link: &str) -> Option<&str> {
    HTTP_URL
        .captures(link)
        .and_then(|caps| caps.name("netloc"))
        .map(|m| m.as_str())
}

/// Domain (host plus optional port) of a seed URL
///
/// Returns `None` when the URL is not an absolute http(s) URL with an authority.
pub fn domain_of(url: &str) -> Option<String> {
    netloc(url)
        .filter(|netloc| !netloc.is_empty())
        .map(str::to_string)
}

/// Canonicalize a single raw link against `domain`
///
/// Returns `None` for links outside the domain and for every link shape other
/// than absolute http(s) and root-relative paths.
pub fn canonicalize(domain: &str, link: &str) -> Option<String> {
    let mut clean = if let Some(authority) = netloc(link) {
        if authority != domain {
            return None;
        }
        link.to_string()
    } else if let Some(path) = link.strip_prefix('/') {
        format!("https://{}/{}", domain, path)
    } else {
        return None;
    };

    if clean.ends_with('/') {
        clean.pop();
    }
    Some(clean)
}

/// Validate and canonicalize the raw links of one page
///
/// # Arguments
///
/// * `domain` - The crawled domain, compared byte for byte with each link's authority
/// * `links` - Raw `href` values, possibly duplicated
///
/// # Returns
///
/// The set of canonical same-domain URLs
pub fn validate_domain_hyperlinks<S: AsRef<str>>(domain: &str, links: &[S]) -> BTreeSet<String> {
    let unique: HashSet<&str> = links.iter().map(AsRef::as_ref).collect();
    unique
        .into_iter()
        .filter_map(|link| canonicalize(domain, link))
        .collect()
}
