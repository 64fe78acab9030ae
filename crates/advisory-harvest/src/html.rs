//! Tolerant anchor extraction.
//!
//! Only `<a ...>...</a>` elements are of interest, so instead of building a
//! DOM the page is scanned for anchor blocks. Tag and attribute names are
//! matched case-insensitively; attribute values may use double quotes,
//! single quotes or no quotes.

use regex::Regex;
use std::sync::LazyLock;

static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("valid anchor regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

/// One anchor element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Anchor {
    pub href: Option<String>,
    pub classes: Vec<String>,
    /// Inner text with tags stripped, entities decoded and whitespace collapsed.
    pub text: String,
}

impl Anchor {
    /// Whether the anchor carries every class in `required`.
    pub fn has_classes(&self, required: &[&str]) -> bool {
        required
            .iter()
            .all(|class| self.classes.iter().any(|c| c == class))
    }
}

/// All anchors in `html`, in document order.
pub fn anchors(html: &str) -> Vec<Anchor> {
    ANCHOR
        .captures_iter(html)
        .map(|caps| {
            let attributes = caps.get(1).map_or("", |m| m.as_str());
            let inner = caps.get(2).map_or("", |m| m.as_str());
            let mut anchor = Anchor {
                text: inner_text(inner),
                ..Anchor::default()
            };
            for attr in ATTRIBUTE.captures_iter(attributes) {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map_or(String::new(), |m| decode_entities(m.as_str()));
                match attr[1].to_ascii_lowercase().as_str() {
                    "href" => anchor.href = Some(value),
                    "class" => {
                        anchor.classes = value.split_whitespace().map(str::to_string).collect()
                    }
                    _ => {}
                }
            }
            anchor
        })
        .collect()
}

fn inner_text(inner: &str) -> String {
    let stripped = TAG.replace_all(inner, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_href_classes_and_text() {
        let html = r#"<div><a class="anchor anchor--underline anchor--default" href="/vuln/SNYK-JAVA-1">
            <span>Remote Code Execution</span></a></div>"#;
        let found = anchors(html);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].href.as_deref(), Some("/vuln/SNYK-JAVA-1"));
        assert!(found[0].has_classes(&["anchor", "anchor--default"]));
        assert!(!found[0].has_classes(&["anchor--primary"]));
        assert_eq!(found[0].text, "Remote Code Execution");
    }

    #[test]
    fn test_attribute_quoting_and_case() {
        let html = "<A HREF='/a?x=1&amp;y=2' Class=plain>One</A><a href=/b>Two</a>";
        let found = anchors(html);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].href.as_deref(), Some("/a?x=1&y=2"));
        assert_eq!(found[0].classes, vec!["plain"]);
        assert_eq!(found[1].href.as_deref(), Some("/b"));
        assert!(found[1].classes.is_empty());
    }

    #[test]
    fn test_anchor_without_href() {
        let found = anchors(r#"<a name="top">Top</a>"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].href, None);
    }

    #[test]
    fn test_entities_in_text() {
        let found = anchors("<a href='#'>GitHub&nbsp;Commit</a>");
        assert_eq!(found[0].text, "GitHub Commit");
    }

    #[test]
    fn test_abbr_is_not_an_anchor() {
        assert!(anchors("<abbr title='x'>x</abbr>").is_empty());
    }
}
