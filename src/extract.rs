//! Concrete `scraper`-based HTML extraction: plain text with whitespace
//! collapsed, lowercased to match the original crawler's behavior, plus the
//! raw `href` of every `<a>` element in document order.

use scraper::{Html, Selector};

pub struct ExtractedPage {
    pub text: String,
    pub links: Vec<String>,
}

/// Parse `html` and pull out text + links. Never fails: malformed HTML is
/// handled leniently by `scraper` (it falls back to best-effort parsing);
/// deciding to discard a page on a parse problem is the caller's job, not
/// this function's.
pub fn extract(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let a_selector = Selector::parse("a").expect("static selector is valid");
    let links = document
        .select(&a_selector)
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .collect();

    ExtractedPage { text, links }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_lowercases_text() {
        let html = "<html><body>Hello   <b>World</b>\n\n  Test</body></html>";
        let page = extract(html);
        assert_eq!(page.text, "hello world test");
    }

    #[test]
    fn collects_links_in_document_order() {
        let html = r#"<html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#;
        let page = extract(html);
        assert_eq!(page.links, vec!["/a", "/b"]);
    }

    #[test]
    fn byte_identical_html_yields_byte_identical_text() {
        let html = "<p>Repeat after me: hello hello hello</p>";
        assert_eq!(extract(html).text, extract(html).text);
    }
}
