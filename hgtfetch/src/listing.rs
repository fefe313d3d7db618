//! Remote listing access.
//!
//! Index regeneration needs two things from the remote side: the archive
//! filenames in an SRTM server directory listing, and the image-map areas
//! (pixel rectangle plus archive link) of a viewfinder coverage page. The
//! [`RemoteListing`] trait is that seam; the core never owns transport,
//! so the versioning protocol runs against fakes in tests. [`HttpListing`]
//! is the production implementation.

use crate::error::Result;

/// One `<area>` element of a coverage-map page: the raw pixel `coords`
/// attribute and the linked archive URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapArea {
    pub coords: String,
    pub href: String,
}

/// Access to remote directory listings and coverage maps.
pub trait RemoteListing {
    /// Archive filenames (anchor texts ending in `hgt.zip`) in the
    /// directory listing at `url`.
    fn archive_names(&self, url: &str) -> Result<Vec<String>>;

    /// Image-map areas of the coverage page at `url`.
    fn coverage_areas(&self, url: &str) -> Result<Vec<MapArea>>;
}

#[cfg(feature = "download")]
pub use http::HttpListing;

#[cfg(feature = "download")]
mod http {
    use std::sync::OnceLock;
    use std::time::Duration;

    use regex::Regex;
    use reqwest::blocking::Client;
    use tracing::debug;

    use super::{MapArea, RemoteListing};
    use crate::error::{FetchError, Result};

    /// Timeout for listing requests in seconds.
    const LISTING_TIMEOUT_SECS: u64 = 120;

    fn anchor_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?is)<a\b[^>]*>\s*([^<>]*?hgt\.zip)\s*</a>").expect("static regex")
        })
    }

    fn area_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(?is)<area\b[^>]*>").expect("static regex"))
    }

    fn coords_attr_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r#"(?i)coords\s*=\s*"([^"]*)""#).expect("static regex"))
    }

    fn href_attr_re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r#"(?i)href\s*=\s*"([^"]*)""#).expect("static regex"))
    }

    /// Fetches listings over HTTP and extracts the relevant parts of the
    /// returned HTML.
    pub struct HttpListing {
        client: Client,
    }

    impl HttpListing {
        pub fn new() -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(LISTING_TIMEOUT_SECS))
                .build()
                .map_err(|e| FetchError::IndexUnavailable {
                    what: "http client".to_string(),
                    reason: e.to_string(),
                })?;
            Ok(Self { client })
        }

        fn get(&self, url: &str) -> Result<String> {
            debug!("fetching listing {url}");
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| FetchError::IndexUnavailable {
                    what: url.to_string(),
                    reason: e.to_string(),
                })?;
            if !response.status().is_success() {
                return Err(FetchError::IndexUnavailable {
                    what: url.to_string(),
                    reason: format!("HTTP {}", response.status()),
                });
            }
            response.text().map_err(|e| FetchError::IndexUnavailable {
                what: url.to_string(),
                reason: e.to_string(),
            })
        }
    }

    impl RemoteListing for HttpListing {
        fn archive_names(&self, url: &str) -> Result<Vec<String>> {
            Ok(parse_archive_names(&self.get(url)?))
        }

        fn coverage_areas(&self, url: &str) -> Result<Vec<MapArea>> {
            Ok(parse_coverage_areas(&self.get(url)?))
        }
    }

    /// Anchor texts ending in `hgt.zip` (the server's historical naming
    /// slip `<TILE>hgt.zip` included).
    pub(crate) fn parse_archive_names(html: &str) -> Vec<String> {
        anchor_re()
            .captures_iter(html)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// All `<area>` elements carrying both a `coords` and an `href`
    /// attribute.
    pub(crate) fn parse_coverage_areas(html: &str) -> Vec<MapArea> {
        area_re()
            .find_iter(html)
            .filter_map(|tag| {
                let tag = tag.as_str();
                let coords = coords_attr_re().captures(tag)?[1].trim().to_string();
                let href = href_attr_re().captures(tag)?[1].trim().to_string();
                Some(MapArea { coords, href })
            })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_archive_names() {
            let html = r#"
                <html><body><pre>
                <a href="N35E138.hgt.zip">N35E138.hgt.zip</a>
                <a href="S01E009hgt.zip"> S01E009hgt.zip </a>
                <a href="../">Parent Directory</a>
                <a href="readme.txt">readme.txt</a>
                </pre></body></html>"#;
            assert_eq!(
                parse_archive_names(html),
                vec!["N35E138.hgt.zip", "S01E009hgt.zip"]
            );
        }

        #[test]
        fn test_parse_coverage_areas() {
            let html = r#"
                <map name="coverage">
                <area shape="rect" coords="450,250,455,255" href="http://example.com/L36.zip">
                <AREA HREF="http://example.com/L37.zip" COORDS="455,250,460,255">
                <area shape="rect" coords="0,0,5,5">
                </map>"#;
            let areas = parse_coverage_areas(html);
            assert_eq!(areas.len(), 2);
            assert_eq!(areas[0].coords, "450,250,455,255");
            assert_eq!(areas[0].href, "http://example.com/L36.zip");
            assert_eq!(areas[1].href, "http://example.com/L37.zip");
        }

        #[test]
        fn test_parse_empty_page() {
            assert!(parse_archive_names("<html></html>").is_empty());
            assert!(parse_coverage_areas("<html></html>").is_empty());
        }
    }
}
