//! Allow-list sanitizer for preview markup.
//!
//! Elements outside the policy are unwrapped, keeping their children, unless
//! their content is never meant to be shown (`script`, `iframe`, ...), in
//! which case the whole subtree goes. Attributes outside the policy are
//! dropped, and so are links whose scheme could run code.

use autoletter_common::{walk_element_mut, VisitorMut};
use autoletter_parser::{Element, Fragment, Node};
use std::collections::HashSet;
use tracing::debug;

const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "div", "span", "strong", "b", "em", "i", "u", "s", "a", "ul", "ol", "li", "h1", "h2",
    "h3", "blockquote",
];

const DROPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "template", "noscript", "textarea", "select",
];

const GLOBAL_ATTRIBUTES: &[&str] = &["target", "rel"];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

const SAFE_REL: &str = "noopener noreferrer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizePolicy {
    pub allowed_tags: HashSet<String>,
    /// Removed together with everything inside them
    pub dropped_tags: HashSet<String>,
    /// Allowed on any kept element
    pub global_attributes: HashSet<String>,
    /// Schemes a link may use; relative and fragment links always pass
    pub url_schemes: HashSet<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        fn set(items: &[&str]) -> HashSet<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            allowed_tags: set(ALLOWED_TAGS),
            dropped_tags: set(DROPPED_TAGS),
            global_attributes: set(GLOBAL_ATTRIBUTES),
            url_schemes: set(SAFE_SCHEMES),
        }
    }
}

impl SanitizePolicy {
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    pub fn drops_content(&self, tag: &str) -> bool {
        self.dropped_tags.contains(tag)
    }

    pub fn allows_attribute(&self, tag: &str, name: &str) -> bool {
        (tag == "a" && name == "href") || self.global_attributes.contains(name)
    }

    /// `false` for URLs whose scheme is not on the list. Tabs, newlines and
    /// control characters are ignored when reading the scheme.
    pub fn allows_url(&self, url: &str) -> bool {
        let compact: String = url
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect();

        match compact.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
            Some(idx) if compact[idx..].starts_with(':') => {
                let scheme = compact[..idx].to_ascii_lowercase();
                self.url_schemes.contains(&scheme)
            }
            _ => true,
        }
    }
}

/// What a sanitizing pass took out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub dropped_elements: usize,
    pub unwrapped_elements: usize,
    pub dropped_attributes: usize,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        *self == SanitizeReport::default()
    }
}

pub struct Sanitizer {
    policy: SanitizePolicy,
    report: SanitizeReport,
}

impl Sanitizer {
    pub fn new(policy: SanitizePolicy) -> Self {
        Self {
            policy,
            report: SanitizeReport::default(),
        }
    }

    pub fn report(&self) -> SanitizeReport {
        self.report
    }

    fn clean_attributes(&mut self, el: &mut Element) {
        let before = el.attributes.len();
        let policy = &self.policy;
        let tag = el.tag.clone();
        el.attributes.retain(|attr| {
            policy.allows_attribute(&tag, &attr.name) && (attr.name != "href" || policy.allows_url(&attr.value))
        });
        self.report.dropped_attributes += before - el.attributes.len();

        let opens_new_tab = el
            .attribute("target")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("_blank"));
        if tag == "a" && opens_new_tab {
            el.set_attribute("rel", SAFE_REL);
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(SanitizePolicy::default())
    }
}

impl VisitorMut for Sanitizer {
    fn visit_children_mut(&mut self, children: &mut Vec<Node>) {
        let mut kept = Vec::with_capacity(children.len());

        for node in std::mem::take(children) {
            match node {
                Node::Text(text) => push_node(&mut kept, Node::Text(text)),
                Node::Element(el) if self.policy.drops_content(&el.tag) => {
                    debug!(tag = %el.tag, "dropped element");
                    self.report.dropped_elements += 1;
                }
                Node::Element(mut el) if !self.policy.allows_tag(&el.tag) => {
                    debug!(tag = %el.tag, "unwrapped element");
                    self.report.unwrapped_elements += 1;
                    let mut inner = std::mem::take(&mut el.children);
                    self.visit_children_mut(&mut inner);
                    for child in inner {
                        push_node(&mut kept, child);
                    }
                }
                Node::Element(mut el) => {
                    self.visit_element_mut(&mut el);
                    kept.push(Node::Element(el));
                }
            }
        }

        *children = kept;
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        self.clean_attributes(element);
        walk_element_mut(self, element);
    }
}

/// Text from unwrapped elements joins the text next to it
fn push_node(nodes: &mut Vec<Node>, node: Node) {
    if let (Node::Text(text), Some(Node::Text(prev))) = (&node, nodes.last_mut()) {
        prev.push_str(text);
        return;
    }
    nodes.push(node);
}

/// Sanitize with the default policy
pub fn sanitize(fragment: &mut Fragment) -> SanitizeReport {
    let mut sanitizer = Sanitizer::default();
    sanitizer.visit_fragment_mut(fragment);
    sanitizer.report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoletter_parser::{parse, serialize};

    fn clean(html: &str) -> String {
        let mut fragment = parse(html).unwrap();
        sanitize(&mut fragment);
        serialize(&fragment)
    }

    #[test]
    fn test_allowed_markup_untouched() {
        let html = "<h1>T</h1><p><strong>a</strong> <em>b</em> <u>c</u> <s>d</s></p><ul><li>x</li></ul><blockquote>q</blockquote>";
        assert_eq!(clean(html), html);
    }

    #[test]
    fn test_event_handlers_and_styles_dropped() {
        assert_eq!(
            clean(r#"<p onclick="steal()" style="color:red" class="x">Hi</p>"#),
            "<p>Hi</p>"
        );
    }

    #[test]
    fn test_script_removed_with_content() {
        assert_eq!(clean("<p>a<script>alert(1)</script>b</p>"), "<p>ab</p>");
        assert_eq!(clean("<style>p{}</style><p>x</p>"), "<p>x</p>");
        assert_eq!(clean(r#"<div><iframe src="x"></iframe><h4>T</h4></div>"#), "<div>T</div>");
    }

    #[test]
    fn test_unknown_elements_unwrapped() {
        assert_eq!(clean(r#"<p><font color="red">x</font> y</p>"#), "<p>x y</p>");
        assert_eq!(clean(r#"<img src="x" onerror="alert(1)">"#), "");
    }

    #[test]
    fn test_unwrapped_children_are_sanitized() {
        assert_eq!(
            clean(r#"<section><p onmouseover="x()">a<script>b</script></p></section>"#),
            "<p>a</p>"
        );
    }

    #[test]
    fn test_unsafe_href_dropped() {
        assert_eq!(clean(r#"<a href="javascript:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(clean("<a href=\" JaVa\tScript:alert(1)\">x</a>"), "<a>x</a>");
        assert_eq!(clean(r#"<a href="data:text/html,x">x</a>"#), "<a>x</a>");
    }

    #[test]
    fn test_safe_href_kept() {
        for href in ["https://x.com/a?b=c", "http://x.com", "mailto:a@b.co", "tel:+100", "/path", "#top", "page?x=a:b"] {
            let html = format!(r#"<a href="{}">x</a>"#, href);
            assert_eq!(clean(&html), html, "{}", href);
        }
    }

    #[test]
    fn test_href_only_on_anchors() {
        assert_eq!(clean(r#"<span href="https://x.com">x</span>"#), "<span>x</span>");
    }

    #[test]
    fn test_blank_target_forces_rel() {
        assert_eq!(
            clean(r#"<a href="https://x.com" target="_blank">x</a>"#),
            r#"<a href="https://x.com" target="_blank" rel="noopener noreferrer">x</a>"#
        );
        assert_eq!(
            clean(r#"<a rel="opener" target="_blank" href="https://x.com">x</a>"#),
            r#"<a rel="noopener noreferrer" target="_blank" href="https://x.com">x</a>"#
        );
    }

    #[test]
    fn test_report_counts() {
        let mut fragment = parse(r#"<p onclick="x">a<font>b</font><script>c</script></p>"#).unwrap();
        let report = sanitize(&mut fragment);

        assert_eq!(
            report,
            SanitizeReport {
                dropped_elements: 1,
                unwrapped_elements: 1,
                dropped_attributes: 1,
            }
        );
        assert!(sanitize(&mut fragment).is_clean());
    }
}
