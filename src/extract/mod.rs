//! Best-effort extraction of listing records from the community page.
//!
//! The page markup is not versioned, so extraction is driven by weak
//! structural signals (see [`matchers`]) rather than fixed selectors. Inputs
//! that carry no listings, including challenge pages and empty strings,
//! simply produce no records.

pub mod matchers;

use crate::fetchers::types::Site;
use crate::models::{ListingRecord, ListingType};
use chrono::{DateTime, Utc};
use matchers::{ClassMarkerMatcher, NodeMatcher, HEADING_TAGS};
use scraper::{ElementRef, Html};
use tracing::debug;

/// Upper bound on candidate containers, and therefore on records
pub const MAX_LISTINGS: usize = 15;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
/// Shorter titles are treated as stray link text
pub const MIN_TITLE_CHARS: usize = 4;

pub struct Extractor {
    site: Site,
    candidates: Vec<Box<dyn NodeMatcher>>,
    containers: Vec<Box<dyn NodeMatcher>>,
    description: ClassMarkerMatcher,
    dates: Vec<Box<dyn NodeMatcher>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(Site::default())
    }
}

impl Extractor {
    pub fn new(site: Site) -> Self {
        Self {
            candidates: matchers::candidate_matchers(&site),
            containers: matchers::container_matchers(),
            description: matchers::description_matcher(),
            dates: matchers::date_matchers(),
            site,
        }
    }

    /// Extract listings, stamping the current time on records without a date
    pub fn extract(&self, html: &str) -> Vec<ListingRecord> {
        self.extract_at(html, Utc::now())
    }

    /// Extract listings, stamping `now` on records without a date
    pub fn extract_at(&self, html: &str, now: DateTime<Utc>) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let candidates = self.candidates(&document);
        debug!("Found {} candidate containers", candidates.len());

        candidates
            .into_iter()
            .enumerate()
            .filter_map(|(idx, candidate)| {
                let record = self.record(&document, candidate, now);
                if record.is_none() {
                    debug!("Skipped candidate {}: no usable title", idx);
                }
                record
            })
            .collect()
    }

    /// Candidate containers by signal priority, document order within a signal.
    /// Wrappers are passed over; any other node nested in (or wrapping) an
    /// already chosen container is skipped.
    fn candidates<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let mut selected: Vec<ElementRef<'a>> = Vec::new();

        for matcher in &self.candidates {
            if selected.len() >= MAX_LISTINGS {
                break;
            }
            let before = selected.len();
            for element in elements(document.root_element()) {
                if !matcher.matches(element) || self.is_wrapper(element) {
                    continue;
                }
                if selected.iter().any(|chosen| overlaps(*chosen, element)) {
                    continue;
                }
                selected.push(element);
            }
            debug!(
                signal = matcher.name(),
                added = selected.len() - before,
                "candidate signal"
            );
        }

        selected.truncate(MAX_LISTINGS);
        selected
    }

    /// True when `element` holds at least two containers that do not nest
    fn is_wrapper(&self, element: ElementRef<'_>) -> bool {
        let mut nested = elements(element)
            .skip(1)
            .filter(|inner| self.containers.iter().any(|m| m.matches(*inner)));
        let Some(first) = nested.next() else {
            return false;
        };
        nested.any(|inner| !inner.ancestors().any(|node| node.id() == first.id()))
    }

    fn record(
        &self,
        document: &Html,
        candidate: ElementRef<'_>,
        now: DateTime<Utc>,
    ) -> Option<ListingRecord> {
        let href = first_href(candidate);
        let title = self.title(document, candidate, href)?;

        let url = match href {
            Some(href) => self.resolve(href),
            None => self.site.listings_url.clone(),
        };

        let description = elements(candidate)
            .skip(1)
            .filter(|element| self.description.matches(*element))
            .map(text_of)
            .find(|text| !text.is_empty())
            .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
            .unwrap_or_default();

        let date = self.date(candidate).unwrap_or_else(|| now.to_rfc3339());

        Some(ListingRecord {
            title,
            url,
            description,
            kind: ListingType::CommunityListing,
            date,
        })
    }

    /// First heading, else first link, else another link to the same href
    fn title(
        &self,
        document: &Html,
        candidate: ElementRef<'_>,
        href: Option<&str>,
    ) -> Option<String> {
        let heading = elements(candidate)
            .find(|element| HEADING_TAGS.contains(&element.value().name()))
            .and_then(|element| usable_title(text_of(element)));
        if heading.is_some() {
            return heading;
        }

        let link = elements(candidate)
            .find(|element| element.value().name() == "a")
            .and_then(|element| usable_title(text_of(element)));
        if link.is_some() {
            return link;
        }

        let href = href?;
        elements(document.root_element())
            .filter(|element| {
                element.value().name() == "a"
                    && element.value().attr("href").map(str::trim) == Some(href)
            })
            .find_map(|element| usable_title(text_of(element)))
    }

    fn date(&self, candidate: ElementRef<'_>) -> Option<String> {
        self.dates.iter().find_map(|matcher| {
            let element = elements(candidate)
                .skip(1)
                .find(|element| matcher.matches(*element))?;
            let value = element
                .value()
                .attr("datetime")
                .map(|attr| attr.trim().to_string())
                .filter(|attr| !attr.is_empty())
                .unwrap_or_else(|| text_of(element));
            (!value.is_empty()).then_some(value)
        })
    }

    /// Root-relative paths are joined onto the origin; anything else is kept
    fn resolve(&self, href: &str) -> String {
        if href.starts_with('/') {
            format!("{}{}", self.site.origin, href)
        } else {
            href.to_string()
        }
    }
}

/// Text of the document `<title>`, for diagnostics
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title = elements(document.root_element())
        .find(|element| element.value().name() == "title")
        .map(text_of);
    title.filter(|title| !title.is_empty())
}

/// `root` and every element below it, in document order
fn elements(root: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    root.descendants().filter_map(ElementRef::wrap)
}

fn overlaps(a: ElementRef<'_>, b: ElementRef<'_>) -> bool {
    a.id() == b.id()
        || a.ancestors().any(|node| node.id() == b.id())
        || b.ancestors().any(|node| node.id() == a.id())
}

fn first_href(candidate: ElementRef<'_>) -> Option<&str> {
    elements(candidate)
        .filter(|element| element.value().name() == "a")
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
}

/// Concatenated text with whitespace runs collapsed
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn usable_title(text: String) -> Option<String> {
    (text.chars().count() >= MIN_TITLE_CHARS).then_some(text)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
