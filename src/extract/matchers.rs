//! Predicates over parsed document nodes.
//!
//! Candidate containers and listing fields are located by running an
//! ordered list of these matchers over the document; each one looks at a
//! single element and answers yes or no.

use crate::fetchers::types::Site;
use scraper::ElementRef;

pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4"];

pub trait NodeMatcher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn matches(&self, element: ElementRef<'_>) -> bool;
}

/// Matches elements by tag name
pub struct TagMatcher {
    name: &'static str,
    tags: &'static [&'static str],
}

impl TagMatcher {
    pub const fn new(name: &'static str, tags: &'static [&'static str]) -> Self {
        Self { name, tags }
    }
}

impl NodeMatcher for TagMatcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, element: ElementRef<'_>) -> bool {
        self.tags.contains(&element.value().name())
    }
}

/// Matches elements whose `class` attribute contains one of `markers`,
/// ignoring case. `tags` narrows the match to those element names.
pub struct ClassMarkerMatcher {
    name: &'static str,
    tags: Option<&'static [&'static str]>,
    markers: &'static [&'static str],
}

impl ClassMarkerMatcher {
    pub const fn new(
        name: &'static str,
        tags: Option<&'static [&'static str]>,
        markers: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            tags,
            markers,
        }
    }
}

impl NodeMatcher for ClassMarkerMatcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, element: ElementRef<'_>) -> bool {
        if let Some(tags) = self.tags {
            if !tags.contains(&element.value().name()) {
                return false;
            }
        }
        let Some(class) = element.value().attr("class") else {
            return false;
        };
        let class = class.to_lowercase();
        self.markers.iter().any(|marker| class.contains(marker))
    }
}

/// Matches `<a>` elements whose `href` starts with a path prefix
pub struct HrefPrefixMatcher {
    prefix: String,
}

impl HrefPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl NodeMatcher for HrefPrefixMatcher {
    fn name(&self) -> &'static str {
        "listing-link"
    }

    fn matches(&self, element: ElementRef<'_>) -> bool {
        element.value().name() == "a"
            && element
                .value()
                .attr("href")
                .is_some_and(|href| href.starts_with(&self.prefix))
    }
}

/// Signals for listing candidates, strongest first
pub fn candidate_matchers(site: &Site) -> Vec<Box<dyn NodeMatcher>> {
    let mut matchers = container_matchers();
    matchers.push(Box::new(HrefPrefixMatcher::new(site.link_prefix.clone())));
    matchers
}

/// Structural signals, i.e. every candidate signal except bare links
pub fn container_matchers() -> Vec<Box<dyn NodeMatcher>> {
    vec![
        Box::new(TagMatcher::new("article", &["article"])),
        Box::new(ClassMarkerMatcher::new(
            "div-class",
            Some(&["div"]),
            &["listing", "item", "post"],
        )),
        Box::new(ClassMarkerMatcher::new(
            "li-class",
            Some(&["li"]),
            &["listing", "item"],
        )),
    ]
}

pub fn description_matcher() -> ClassMarkerMatcher {
    ClassMarkerMatcher::new("description", None, &["desc", "summary", "excerpt"])
}

/// Date carriers in preference order
pub fn date_matchers() -> Vec<Box<dyn NodeMatcher>> {
    vec![
        Box::new(ClassMarkerMatcher::new("date-class", None, &["date"])),
        Box::new(TagMatcher::new("time", &["time"])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_matching<'a>(document: &'a Html, matcher: &dyn NodeMatcher) -> Option<ElementRef<'a>> {
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| matcher.matches(*element))
    }

    #[test]
    fn tag_matcher_matches_by_name() {
        let document = Html::parse_document("<div><article id=a></article></div>");
        let matcher = TagMatcher::new("article", &["article"]);

        let found = first_matching(&document, &matcher).unwrap();
        assert_eq!(found.value().id(), Some("a"));
    }

    #[test]
    fn class_marker_is_case_insensitive() {
        let document = Html::parse_document(r#"<div class="Community-LISTING">x</div>"#);
        let matcher = ClassMarkerMatcher::new("div-class", Some(&["div"]), &["listing"]);

        assert!(first_matching(&document, &matcher).is_some());
    }

    #[test]
    fn class_marker_respects_tag_filter() {
        let document = Html::parse_document(r#"<span class="post">x</span>"#);
        let narrowed = ClassMarkerMatcher::new("div-class", Some(&["div"]), &["post"]);
        let any_tag = ClassMarkerMatcher::new("any", None, &["post"]);

        assert!(first_matching(&document, &narrowed).is_none());
        assert!(first_matching(&document, &any_tag).is_some());
    }

    #[test]
    fn class_marker_needs_a_class() {
        let document = Html::parse_document(r#"<div id="listing">x</div>"#);
        let matcher = ClassMarkerMatcher::new("div-class", Some(&["div"]), &["listing"]);

        assert!(first_matching(&document, &matcher).is_none());
    }

    #[test]
    fn href_prefix_only_matches_links() {
        let document = Html::parse_document(
            r#"<link href="/community/feed.xml"><a href="/about/">About</a><a href="/community/open-call">Open call</a>"#,
        );
        let matcher = HrefPrefixMatcher::new("/community/");

        let found = first_matching(&document, &matcher).unwrap();
        assert_eq!(found.value().attr("href"), Some("/community/open-call"));
    }

    #[test]
    fn description_markers() {
        let matcher = description_matcher();
        for class in ["entry-desc", "Summary", "post-excerpt"] {
            let html = format!(r#"<p class="{class}">text</p>"#);
            let document = Html::parse_document(&html);
            assert!(first_matching(&document, &matcher).is_some(), "{class}");
        }
    }

    #[test]
    fn candidate_signals_are_ordered() {
        let names: Vec<_> = candidate_matchers(&Site::default())
            .iter()
            .map(|m| m.name())
            .collect();
        assert_eq!(names, ["article", "div-class", "li-class", "listing-link"]);
    }

    #[test]
    fn container_signals_exclude_links() {
        let names: Vec<_> = container_matchers().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["article", "div-class", "li-class"]);
    }
}
