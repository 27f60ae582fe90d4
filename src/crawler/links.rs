//! Hyperlink extraction for fetched pages
//!
//! Collects the raw `href` value of every anchor in a document. Nothing is
//! resolved, filtered or deduplicated here; that is the normalizer's job.

use scraper::Html;

/// Whether a declared content type is HTML
///
/// A missing header is treated as "not HTML".
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("text/html"))
}

/// Extract the raw hyperlinks of a response
///
/// Returns an empty list without parsing when the content type is not HTML.
///
/// # Arguments
///
/// * `content_type` - The declared `Content-Type` header, if any
/// * `html` - The response body
///
/// # Returns
///
/// Every anchor `href` in document order, duplicates included
pub fn extract_hyperlinks(content_type: Option<&str>, html: &str) -> Vec<String> {
    if !is_html(content_type) {
        return Vec::new();
    }
    parse_hyperlinks(html)
}

/// Parse an HTML document and return every anchor `href` in document order
pub fn parse_hyperlinks(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(|node| node.value().as_element())
        .filter(|element| element.name() == "a")
        .filter_map(|element| element.attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><head><title>Test</title></head><body>\
        <a href='https://www.google.com'>Google</a>\
        <a href='https://www.google.com/search'>Search</a>\
        <a href='https://www.baidu.com'>baidu</a></body></html>";

    #[test]
    fn test_single_anchor() {
        assert_eq!(parse_hyperlinks("<a href='X'>t</a>"), vec!["X".to_string()]);
    }

    #[test]
    fn test_document_order_and_duplicates() {
        let html = r##"<p><a href="/b">b</a><span><a href="/a">a</a></span>
            <a href="/b">again</a><a name="anchor">no href</a><a href="#top">top</a></p>"##;
        assert_eq!(parse_hyperlinks(html), vec!["/b", "/a", "/b", "#top"]);
    }

    #[test]
    fn test_html_content_type() {
        let links = extract_hyperlinks(Some("text/html; charset=utf-8"), PAGE);
        assert!(links.contains(&"https://www.google.com".to_string()));
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_non_html_content_type() {
        assert!(extract_hyperlinks(Some("text/text"), PAGE).is_empty());
        assert!(extract_hyperlinks(Some("application/json"), PAGE).is_empty());
    }

    #[test]
    fn test_missing_content_type() {
        assert!(!is_html(None));
        assert!(extract_hyperlinks(None, PAGE).is_empty());
    }

    #[test]
    fn test_other_tags_ignored() {
        let html = r#"<link href="/style.css"><area href="/map"><img src="/x.png">"#;
        assert!(parse_hyperlinks(html).is_empty());
    }
}
