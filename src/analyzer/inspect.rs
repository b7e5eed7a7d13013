// src/analyzer/inspect.rs
// =============================================================================
// Pure, synchronous extraction of page facts from a parsed document:
// - declared HTML version
// - title
// - heading histogram
// - whether the page looks like it has a login form
//
// Nothing here does I/O. The version and login checks are substring
// heuristics over the lower-cased serialized document (not a doctype parser,
// not scoped to <form> elements), and the checks run in a fixed order.
// =============================================================================

use scraper::Selector;
use std::collections::BTreeMap;

use super::fetch::ParsedDocument;

/// Markers tested in order against the lower-cased document. First match wins.
const VERSION_MARKERS: [(&str, &str); 4] = [
    ("<!doctype html>", "HTML5"),
    ("html 4.01", "HTML 4.01"),
    ("xhtml 1.0", "XHTML 1.0"),
    ("xhtml 1.1", "XHTML 1.1"),
];

const UNKNOWN_VERSION: &str = "Unknown";

const PASSWORD_MARKERS: [&str; 2] = ["type=\"password\"", "type='password'"];

const LOGIN_TEXTS: [&str; 4] = ["login", "log in", "sign in", "sign up"];

/// Everything the inspector reports about one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub html_version: String,
    pub title: String,
    pub heading_counts: BTreeMap<String, usize>,
    pub has_login_form: bool,
}

/// Runs every check over `doc`, serializing it only once.
pub fn inspect(doc: &ParsedDocument) -> Inspection {
    let lowered = doc.serialize().to_lowercase();

    Inspection {
        html_version: version_from_lowered(&lowered).to_string(),
        title: extract_title(doc),
        heading_counts: count_headings(doc),
        has_login_form: login_from_lowered(doc, &lowered),
    }
}

/// "HTML5", "HTML 4.01", "XHTML 1.0", "XHTML 1.1" or "Unknown".
fn version_from_lowered(lowered: &str) -> &'static str {
    VERSION_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, version)| *version)
        .unwrap_or(UNKNOWN_VERSION)
}

/// Text of the first `<title>` element, or an empty string.
pub fn extract_title(doc: &ParsedDocument) -> String {
    // Constant selector, known to be valid
    let selector = Selector::parse("title").unwrap();

    doc.html()
        .select(&selector)
        .next()
        .map(|title| title.text().collect())
        .unwrap_or_default()
}

/// Counts `h0`..=`h6` elements. Levels with no match are left out.
///
/// `h0` is not a real HTML heading but is counted all the same; a page
/// that uses it as a custom tag shows up in the histogram.
pub fn count_headings(doc: &ParsedDocument) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();

    for level in 0..=6 {
        let tag = format!("h{}", level);
        // "h0".."h6" are plain type selectors and always parse
        let selector = Selector::parse(&tag).unwrap();
        let count = doc.html().select(&selector).count();
        if count > 0 {
            counts.insert(tag, count);
        }
    }

    counts
}

/// True when the page mentions a password input or any login wording.
fn login_from_lowered(doc: &ParsedDocument, lowered: &str) -> bool {
    let has_password_field = PASSWORD_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker));

    let has_login_text = LOGIN_TEXTS.iter().any(|text| lowered.contains(text));

    let root = doc.root().value();
    let root_attrs: Vec<String> = ["action", "id"]
        .iter()
        .filter_map(|name| root.attr(name))
        .map(str::to_lowercase)
        .collect();
    let root_mentions_login = root_attrs
        .iter()
        .any(|attr| LOGIN_TEXTS.iter().any(|text| attr.contains(text)));

    has_password_field || has_login_text || root_mentions_login
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(doc: &ParsedDocument) -> String {
        inspect(doc).html_version
    }

    fn login(doc: &ParsedDocument) -> bool {
        inspect(doc).has_login_form
    }

    fn doc(source: &str) -> ParsedDocument {
        ParsedDocument::parse(source)
    }

    #[test]
    fn test_html5_doctype() {
        let d = doc("<!DOCTYPE html><html><head></head><body></body></html>");
        assert_eq!(version(&d), "HTML5");
    }

    #[test]
    fn test_html5_wins_over_later_markers() {
        let d = doc("<!DOCTYPE html><html><body><p>We moved off HTML 4.01 years ago</p></body></html>");
        assert_eq!(version(&d), "HTML5");
    }

    #[test]
    fn test_html401_doctype() {
        let d = doc(
            r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd"><html><body></body></html>"#,
        );
        assert_eq!(version(&d), "HTML 4.01");
    }

    #[test]
    fn test_xhtml_doctypes() {
        let d10 = doc(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"><html><body></body></html>"#,
        );
        assert_eq!(version(&d10), "XHTML 1.0");

        let d11 = doc(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd"><html><body></body></html>"#,
        );
        assert_eq!(version(&d11), "XHTML 1.1");
    }

    #[test]
    fn test_marker_in_body_counts_without_doctype() {
        let d = doc("<html><body><p>Written in xhtml 1.1 style</p></body></html>");
        assert_eq!(version(&d), "XHTML 1.1");
    }

    #[test]
    fn test_unknown_version() {
        let d = doc("<html><body>hello</body></html>");
        assert_eq!(version(&d), "Unknown");
    }

    #[test]
    fn test_title_first_element_only() {
        let d = doc("<html><head><title>First</title></head><body><svg><title>Second</title></svg></body></html>");
        assert_eq!(extract_title(&d), "First");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let d = doc("<html><body></body></html>");
        assert_eq!(extract_title(&d), "");
    }

    #[test]
    fn test_heading_counts() {
        let d = doc("<body><h1>a</h1><h2>b</h2><h2>c</h2><h2>d</h2><h2>e</h2></body>");
        let counts = count_headings(&d);

        let expected: BTreeMap<String, usize> =
            [("h1".to_string(), 1), ("h2".to_string(), 4)].into_iter().collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_heading_counts_include_h0_and_h6() {
        let d = doc("<body><h0>custom</h0><h6>small</h6></body>");
        let counts = count_headings(&d);
        assert_eq!(counts.get("h0"), Some(&1));
        assert_eq!(counts.get("h6"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_no_headings_is_empty_map() {
        assert!(count_headings(&doc("<p>plain</p>")).is_empty());
    }

    #[test]
    fn test_login_by_password_field() {
        let d = doc(r#"<form><input type="password" name="pw"></form>"#);
        assert!(login(&d));

        let single_quoted = doc("<form><input type='PASSWORD'></form>");
        assert!(login(&single_quoted));
    }

    #[test]
    fn test_login_by_text_anywhere() {
        // Not inside a form at all, still counts
        let d = doc("<nav><a href='/account'>Sign In</a></nav>");
        assert!(login(&d));
    }

    #[test]
    fn test_login_by_root_id() {
        // The id is also in the serialized markup; root attributes are checked too
        let d = doc(r#"<html id="LoginPage"><body></body></html>"#);
        assert!(login(&d));
    }

    #[test]
    fn test_no_login_form() {
        let d = doc("<html><head><title>News</title></head><body><p>Hello</p></body></html>");
        assert!(!login(&d));
    }

    #[test]
    fn test_inspect_combines_everything() {
        let d = doc("<!DOCTYPE html><html><head><title>T</title></head><body><h1>x</h1></body></html>");
        let inspection = inspect(&d);

        assert_eq!(inspection.html_version, "HTML5");
        assert_eq!(inspection.title, "T");
        assert_eq!(inspection.heading_counts.len(), 1);
        assert_eq!(inspection.heading_counts["h1"], 1);
        assert!(!inspection.has_login_form);
    }
}
