use url::Url;

/// The social network whose pages are scraped.
///
/// Every platform-specific literal the engine needs lives here instead of
/// being scattered across the extractors.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Domain substring identifying the platform's own links.
    pub domain: String,
    /// Suffix appended to page titles (`"Test Page - Facebook"`).
    pub site_name: String,
    /// Hostnames the platform serves pages from.
    pub hosts: Vec<String>,
    /// Path segment of the About-page variant.
    pub about_segment: String,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            domain: "facebook.com".to_string(),
            site_name: "Facebook".to_string(),
            hosts: ["www.facebook.com", "facebook.com", "m.facebook.com", "web.facebook.com"]
                .into_iter()
                .map(String::from)
                .collect(),
            about_segment: "about".to_string(),
        }
    }
}

impl Platform {
    /// Point `url` at the About-page variant.
    ///
    /// URLs that already mention the about segment are returned unchanged;
    /// otherwise any trailing slashes are stripped and `/<about>` appended.
    /// Example: `"https://www.facebook.com/testpage/"` →
    /// `"https://www.facebook.com/testpage/about"`
    pub fn about_url(&self, url: &str) -> String {
        let segment = self.about_segment.to_lowercase();
        if url.to_lowercase().contains(&segment) {
            return url.to_string();
        }
        format!("{}/{}", url.trim_end_matches('/'), self.about_segment)
    }

    /// Returns true if `url` is served from one of the platform's hosts.
    pub fn is_known_url(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .is_some_and(|host| self.hosts.iter().any(|h| *h == host))
    }
}
