//! Detection of anti-automation interstitials served in place of the real page.

/// Literal phrases found on Cloudflare challenge pages
pub const DEFAULT_MARKERS: &[&str] = &[
    "Just a moment",
    "Enable JavaScript and cookies to continue",
    "challenge-platform",
];

/// Case-sensitive substring matcher over a fixed marker list
#[derive(Debug, Clone)]
pub struct ChallengeDetector {
    markers: Vec<String>,
}

impl Default for ChallengeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().map(|m| m.to_string()))
    }
}

impl ChallengeDetector {
    pub fn new(markers: impl IntoIterator<Item = String>) -> Self {
        Self {
            markers: markers.into_iter().filter(|m| !m.is_empty()).collect(),
        }
    }

    /// Returns the first marker present in `html`
    pub fn detect(&self, html: &str) -> Option<&str> {
        self.markers
            .iter()
            .find(|marker| html.contains(marker.as_str()))
            .map(String::as_str)
    }
}
