//! Plain-text extraction for the crawler module

use scraper::Html;

/// Strip the tags of an HTML document and return its text
///
/// Every text node is concatenated in document order, without separators,
/// including the text of `<title>`, `<script>` and `<style>` elements.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document.root_element().text().collect()
}

/// Whether the extracted text is a "JavaScript required" interstitial
pub fn requires_javascript(text: &str, marker: &str) -> bool {
    !marker.is_empty() && text.contains(marker)
}
