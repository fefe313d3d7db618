//! Run-scoped configuration.
//!
//! All paths and URL templates live in one [`Config`] value constructed
//! once per run and passed by reference into every component that needs
//! it. Templates use a `{res}` placeholder substituted with the numeric
//! resolution.

use std::path::PathBuf;

use crate::source::{Resolution, Source, SourceKind};

/// Default storage root for tiles and index files.
const DEFAULT_HGT_DIR: &str = "hgt";

/// Default SRTM archive server, one directory tree per resolution.
const DEFAULT_SRTM_SERVER: &str = "http://dds.cr.usgs.gov/srtm/version2_1/SRTM{res}";

/// Default viewfinderpanoramas coverage-map page per resolution.
const DEFAULT_VIEW_COVERAGE_PAGE: &str =
    "http://www.viewfinderpanoramas.org/Coverage%20map%20viewfinderpanoramas_org{res}.htm";

/// Configuration for tile storage and remote endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding index files and per-source tile subdirectories.
    pub hgt_dir: PathBuf,
    /// SRTM server URL template (`{res}` placeholder).
    pub srtm_server: String,
    /// Coverage-map page URL template (`{res}` placeholder).
    pub view_coverage_page: String,
    /// Top-level listing categories on the SRTM server, 3 arc-second tree.
    pub srtm3_dirs: Vec<String>,
    /// Top-level listing categories on the SRTM server, 1 arc-second tree.
    pub srtm1_dirs: Vec<String>,
}

impl Config {
    /// Create a configuration rooted at `hgt_dir` with the default remote
    /// endpoints.
    pub fn new(hgt_dir: impl Into<PathBuf>) -> Self {
        Self {
            hgt_dir: hgt_dir.into(),
            srtm_server: DEFAULT_SRTM_SERVER.to_string(),
            view_coverage_page: DEFAULT_VIEW_COVERAGE_PAGE.to_string(),
            srtm3_dirs: [
                "Africa",
                "Australia",
                "Eurasia",
                "Islands",
                "North_America",
                "South_America",
            ]
            .map(String::from)
            .to_vec(),
            srtm1_dirs: (1..8).map(|i| format!("Region_0{i}")).collect(),
        }
    }

    /// Override the SRTM server URL template.
    pub fn with_srtm_server(mut self, template: impl Into<String>) -> Self {
        self.srtm_server = template.into();
        self
    }

    /// Override the coverage-map page URL template.
    pub fn with_view_coverage_page(mut self, template: impl Into<String>) -> Self {
        self.view_coverage_page = template.into();
        self
    }

    /// SRTM server base URL for a resolution.
    pub fn srtm_server(&self, resolution: Resolution) -> String {
        self.srtm_server
            .replace("{res}", &resolution.to_string())
    }

    /// Listing categories of the SRTM server tree for a resolution.
    pub fn srtm_dirs(&self, resolution: Resolution) -> &[String] {
        match resolution {
            Resolution::Arc1 => &self.srtm1_dirs,
            Resolution::Arc3 => &self.srtm3_dirs,
        }
    }

    /// Coverage-map page URL for a resolution.
    pub fn view_coverage_url(&self, resolution: Resolution) -> String {
        self.view_coverage_page
            .replace("{res}", &resolution.to_string())
    }

    /// Path of the cached index file for a source.
    pub fn index_path(&self, source: Source) -> PathBuf {
        let name = match source.kind {
            SourceKind::Srtm => format!("hgtIndex_{}.txt", source.resolution),
            SourceKind::View => format!("viewfinderHgtIndex_{}.txt", source.resolution),
        };
        self.hgt_dir.join(name)
    }

    /// Directory where a source's downloaded tiles are stored.
    pub fn cache_dir(&self, source: Source) -> PathBuf {
        self.hgt_dir.join(source.subdir())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_HGT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let cfg = Config::default();
        assert_eq!(
            cfg.srtm_server(Resolution::Arc3),
            "http://dds.cr.usgs.gov/srtm/version2_1/SRTM3"
        );
        assert!(cfg
            .view_coverage_url(Resolution::Arc1)
            .ends_with("viewfinderpanoramas_org1.htm"));
        assert_eq!(cfg.srtm_dirs(Resolution::Arc3).len(), 6);
        assert_eq!(cfg.srtm_dirs(Resolution::Arc1).len(), 7);
        assert_eq!(cfg.srtm_dirs(Resolution::Arc1)[0], "Region_01");
    }

    #[test]
    fn test_paths() {
        let cfg = Config::new("/data/hgt");
        assert_eq!(
            cfg.index_path(Source::SRTM3),
            PathBuf::from("/data/hgt/hgtIndex_3.txt")
        );
        assert_eq!(
            cfg.index_path(Source::VIEW1),
            PathBuf::from("/data/hgt/viewfinderHgtIndex_1.txt")
        );
        assert_eq!(
            cfg.cache_dir(Source::VIEW3),
            PathBuf::from("/data/hgt/VIEW3")
        );
    }

    #[test]
    fn test_template_override() {
        let cfg = Config::new("hgt").with_srtm_server("http://mirror.example/SRTM{res}");
        assert_eq!(
            cfg.srtm_server(Resolution::Arc1),
            "http://mirror.example/SRTM1"
        );
    }
}
