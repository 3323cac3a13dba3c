use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fetchers::types::Site;

/// Kind of a listing record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ListingType {
    /// Parsed from the community page
    CommunityListing,
    /// Synthetic record explaining a failure
    SystemMessage,
    /// Synthetic record for a page that loaded but yielded nothing
    Placeholder,
}

/// One normalized entry of the community listings page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ListingType,
    pub date: String,
}

impl ListingRecord {
    /// Synthetic record pointing at the listings index
    pub fn synthetic(
        kind: ListingType,
        title: &str,
        description: &str,
        site: &Site,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.to_string(),
            url: site.listings_url.clone(),
            description: description.to_string(),
            kind,
            date: now.to_rfc3339(),
        }
    }
}

/// Outcome of a run as reported in the envelope
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Success,
    PartialSuccess,
    NoListingsFound,
    CloudflareProtected,
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::PartialSuccess => "partial-success",
            Status::NoListingsFound => "no-listings-found",
            Status::CloudflareProtected => "cloudflare-protected",
            Status::Error => "error",
        }
    }
}

/// Top-level JSON document written on every run.
///
/// `community_listings` is never empty: every constructor that can end up
/// with zero parsed listings substitutes a synthetic record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub community_listings: Vec<ListingRecord>,
    pub last_updated: DateTime<Utc>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    /// Envelope for a page that was fetched and parsed.
    ///
    /// `rendered` tells whether the page came from a real browser; an empty
    /// result there is reported as a partial success.
    pub fn from_listings(
        listings: Vec<ListingRecord>,
        rendered: bool,
        site: &Site,
        now: DateTime<Utc>,
    ) -> Self {
        if !listings.is_empty() {
            return Self {
                community_listings: listings,
                last_updated: now,
                status: Status::Success,
                note: None,
                error: None,
            };
        }

        if rendered {
            Self {
                community_listings: vec![ListingRecord::synthetic(
                    ListingType::Placeholder,
                    "Rhizome Community",
                    "Successfully accessed page but parsing needs refinement",
                    site,
                    now,
                )],
                last_updated: now,
                status: Status::PartialSuccess,
                note: Some("Page accessed via browser, HTML parsing may need updates".to_string()),
                error: None,
            }
        } else {
            Self {
                community_listings: vec![ListingRecord::synthetic(
                    ListingType::SystemMessage,
                    "No listings found",
                    "The page structure may have changed or is not yet supported.",
                    site,
                    now,
                )],
                last_updated: now,
                status: Status::NoListingsFound,
                note: None,
                error: None,
            }
        }
    }

    /// Envelope for a reachable page that refused automated access
    pub fn challenged(reason: impl Into<String>, site: &Site, now: DateTime<Utc>) -> Self {
        Self {
            community_listings: vec![ListingRecord::synthetic(
                ListingType::SystemMessage,
                "Rhizome Community - Cloudflare Protected",
                "The Rhizome community page is protected by Cloudflare bot detection. Browser automation required.",
                site,
                now,
            )],
            last_updated: now,
            status: Status::CloudflareProtected,
            note: Some("Use --fetcher browser (requires a local Chrome/Chromium)".to_string()),
            error: Some(reason.into()),
        }
    }

    /// Envelope for a page that could not be fetched at all
    pub fn failed(reason: impl Into<String>, site: &Site, now: DateTime<Utc>) -> Self {
        Self {
            community_listings: vec![ListingRecord::synthetic(
                ListingType::SystemMessage,
                "Rhizome Community Access Error",
                "Unable to fetch community listings. Connection failed or access denied.",
                site,
                now,
            )],
            last_updated: now,
            status: Status::Error,
            note: None,
            error: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ListingRecord {
        ListingRecord {
            title: title.to_string(),
            url: "https://rhizome.org/community/x".to_string(),
            description: String::new(),
            kind: ListingType::CommunityListing,
            date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let site = Site::default();
        let envelope =
            ResultEnvelope::from_listings(vec![record("Open Call")], false, &site, Utc::now());
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["community_listings"][0]["type"], "community-listing");
        assert!(value.get("note").is_none());
        assert!(value.get("error").is_none());
        assert!(value["last_updated"].as_str().is_some());
    }

    #[test]
    fn empty_listings_get_a_system_message() {
        let site = Site::default();
        let envelope = ResultEnvelope::from_listings(Vec::new(), false, &site, Utc::now());

        assert_eq!(envelope.status, Status::NoListingsFound);
        assert_eq!(envelope.community_listings.len(), 1);
        assert_eq!(envelope.community_listings[0].kind, ListingType::SystemMessage);
        assert_eq!(envelope.community_listings[0].url, site.listings_url);
    }

    #[test]
    fn empty_rendered_page_is_partial_success() {
        let site = Site::default();
        let envelope = ResultEnvelope::from_listings(Vec::new(), true, &site, Utc::now());

        assert_eq!(envelope.status, Status::PartialSuccess);
        assert_eq!(envelope.community_listings[0].kind, ListingType::Placeholder);
        assert!(envelope.note.is_some());
    }

    #[test]
    fn failure_envelopes_carry_one_record_and_reason() {
        let site = Site::default();
        let now = Utc::now();

        let challenged = ResultEnvelope::challenged("challenge page received", &site, now);
        assert_eq!(challenged.status, Status::CloudflareProtected);
        assert_eq!(challenged.community_listings.len(), 1);
        assert_eq!(challenged.error.as_deref(), Some("challenge page received"));

        let failed = ResultEnvelope::failed("connection refused", &site, now);
        assert_eq!(failed.status, Status::Error);
        assert_eq!(failed.community_listings.len(), 1);
        assert_eq!(failed.community_listings[0].kind, ListingType::SystemMessage);

        let value = serde_json::to_value(&challenged).unwrap();
        assert_eq!(value["status"], "cloudflare-protected");
    }
}
