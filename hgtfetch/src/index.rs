//! Versioned source indices.
//!
//! Each source caches what the remote side currently provides in a flat
//! text file so tile resolution does not hit the network every time. The
//! first line is a version header:
//!
//! ```text
//! # SRTM3 index file, VERSION=2
//! ```
//!
//! followed by alternating `[section]` headers and member lines. For the
//! SRTM source the sections are listing categories and the members archive
//! filenames; for the viewfinder source the sections are archive URLs and
//! the members tile names. Both layouts share one [`Index`] type: parsing,
//! version validation and deterministic rewriting are identical, only the
//! meaning of section and member differs.
//!
//! An index whose on-disk version differs from the version this build
//! requires is stale; [`IndexStore`] rebuilds it from the remote listing
//! before returning any data.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::filename::tile_name;
use crate::listing::RemoteListing;
use crate::source::{Resolution, Source, SourceKind};

/// A parsed index: a schema version and ordered sections of member lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub version: u32,
    sections: BTreeMap<String, Vec<String>>,
}

impl Index {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            sections: BTreeMap::new(),
        }
    }

    /// Add an empty section if it does not exist yet.
    pub fn add_section(&mut self, section: impl Into<String>) {
        self.sections.entry(section.into()).or_default();
    }

    /// Append a member to a section, creating the section if needed.
    pub fn push(&mut self, section: &str, member: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .push(member.into());
    }

    /// Replace a section's members wholesale.
    pub fn set_section(&mut self, section: &str, members: Vec<String>) {
        self.sections.insert(section.to_string(), members);
    }

    /// Members of one section, if present.
    pub fn section_members(&self, section: &str) -> Option<&[String]> {
        self.sections.get(section).map(Vec::as_slice)
    }

    /// Iterate sections in sorted order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sections
            .iter()
            .map(|(section, members)| (section.as_str(), members.as_slice()))
    }

    /// Section owning the first occurrence of a member.
    pub fn section_of(&self, member: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == member))
            .map(|(section, _)| section.as_str())
    }

    /// Whether any section lists the member.
    pub fn contains(&self, member: &str) -> bool {
        self.section_of(member).is_some()
    }

    /// Parse index text. The version comes from the first `#` comment
    /// line; a file without one is treated as version 1. Comment and
    /// blank lines are stripped; members before any section header are
    /// ignored.
    pub fn parse(text: &str) -> Self {
        let version = text
            .lines()
            .find(|line| line.starts_with('#'))
            .and_then(|line| {
                line.replace('#', "")
                    .split_whitespace()
                    .last()?
                    .rsplit('=')
                    .next()?
                    .parse()
                    .ok()
            })
            .unwrap_or(1);

        let mut index = Index::new(version);
        let mut current: Option<String> = None;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                let section = line[1..line.len() - 1].to_string();
                index.add_section(section.clone());
                current = Some(section);
            } else if let Some(section) = &current {
                index.push(section, line);
            }
        }
        index
    }

    /// Read and parse an index file.
    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Serialize deterministically: header, then sections in sorted order
    /// with their members.
    pub fn write(&self, path: &Path, label: &str) -> Result<()> {
        let mut text = format!("# {} index file, VERSION={}\n", label, self.version);
        for (section, members) in self.sections() {
            text.push_str(&format!("[{section}]\n"));
            for member in members {
                text.push_str(member);
                text.push('\n');
            }
        }
        fs::write(path, text)?;
        Ok(())
    }
}

/// Loads, regenerates and reconciles the cached source indices.
///
/// Remote content comes in through the [`RemoteListing`] seam, so the
/// versioning and regeneration protocol is testable without a network.
pub struct IndexStore<'a> {
    cfg: &'a Config,
    listing: &'a dyn RemoteListing,
}

impl<'a> IndexStore<'a> {
    pub fn new(cfg: &'a Config, listing: &'a dyn RemoteListing) -> Self {
        Self { cfg, listing }
    }

    /// Load the index for a source, rebuilding it first when the file is
    /// absent or carries a stale version.
    pub fn load(&self, source: Source) -> Result<Index> {
        let path = self.cfg.index_path(source);
        let stale = match Index::read(&path) {
            Ok(index) => index.version != source.index_version(),
            Err(FetchError::Io(e)) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(e),
        };
        if stale {
            info!("creating new version of index file for source {source}");
            self.regenerate(source)?;
        }
        let index = Index::read(&path)?;
        if index.version != source.index_version() {
            return Err(FetchError::IndexVersion {
                path,
                expected: source.index_version(),
                found: index.version,
            });
        }
        Ok(index)
    }

    /// Rebuild one index from the remote listing and write it to disk.
    pub fn regenerate(&self, source: Source) -> Result<()> {
        let path = self.cfg.index_path(source);
        info!("generating index in {}", path.display());
        let index = match source.kind {
            SourceKind::Srtm => self.build_srtm_index(source)?,
            SourceKind::View => self.build_view_index(source)?,
        };
        index.write(&path, source.subdir())?;
        Ok(())
    }

    /// Rebuild all four indices.
    pub fn regenerate_all(&self) -> Result<()> {
        for source in Source::ALL {
            self.regenerate(source)?;
        }
        Ok(())
    }

    /// One section per listing category, holding the archive filenames
    /// found in that category's directory listing.
    fn build_srtm_index(&self, source: Source) -> Result<Index> {
        let server = self.cfg.srtm_server(source.resolution);
        let mut index = Index::new(source.index_version());
        for dir in self.cfg.srtm_dirs(source.resolution) {
            index.add_section(dir.clone());
            let url = format!("{server}/{dir}");
            for archive in self.listing.archive_names(&url)? {
                index.push(dir, archive);
            }
        }
        Ok(index)
    }

    /// One section per archive URL on the coverage-map page, holding the
    /// names of the tiles the page claims the archive covers.
    fn build_view_index(&self, source: Source) -> Result<Index> {
        let url = self.cfg.view_coverage_url(source.resolution);
        let mut owner: BTreeMap<String, String> = BTreeMap::new();
        for area in self.listing.coverage_areas(&url)? {
            let Some((left, top, right, bottom)) = parse_map_coords(&area.coords) else {
                warn!("skipping coverage area with malformed coords {:?}", area.coords);
                continue;
            };
            for name in coverage_tile_names(left, top, right, bottom, source.resolution) {
                owner.insert(name, area.href.clone());
            }
        }
        let mut index = Index::new(source.index_version());
        for (name, archive_url) in owner {
            index.push(&archive_url, name.to_uppercase());
        }
        Ok(index)
    }

    /// After an archive has been unpacked, replace its section with the
    /// tiles actually found inside. Heals drift between what the coverage
    /// map claims and what the archive truly contains.
    pub fn reconcile_view(&self, resolution: Resolution, url: &str, actual: &[String]) -> Result<()> {
        let source = Source {
            kind: SourceKind::View,
            resolution,
        };
        let path = self.cfg.index_path(source);
        if !path.exists() {
            warn!("cannot update index file {}: not there", path.display());
            return Ok(());
        }
        let mut index = self.load(source)?;
        let Some(members) = index.section_members(url) else {
            warn!("no such url in index {}: {url}", path.display());
            return Ok(());
        };
        let mut current = members.to_vec();
        current.sort();
        let mut actual = actual.to_vec();
        actual.sort();
        if current != actual {
            info!("updating index in {}", path.display());
            index.set_section(url, actual);
            index.write(&path, source.subdir())?;
        }
        Ok(())
    }
}

/// Parse an image-map `coords` attribute `left,top,right,bottom`.
fn parse_map_coords(coords: &str) -> Option<(i32, i32, i32, i32)> {
    let mut parts = coords.split(',').map(|c| c.trim().parse::<i32>());
    let left = parts.next()?.ok()?;
    let top = parts.next()?.ok()?;
    let right = parts.next()?.ok()?;
    let bottom = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((left, top, right, bottom))
}

/// Convert a coverage-map pixel rectangle to the names of the tiles it
/// spans. The map graphic is scaled per resolution (1800 px per 360° for
/// the 3 arc-second map, 2000 px for the 1 arc-second map), with pixel
/// positions rounded half-up to degree lines.
fn coverage_tile_names(
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    resolution: Resolution,
) -> Vec<String> {
    let pixels_per_degree = match resolution {
        Resolution::Arc3 => 1800.0 / 360.0,
        Resolution::Arc1 => 2000.0 / 360.0,
    };
    let to_lon = |px: i32| (f64::from(px) / pixels_per_degree + 0.5) as i32 - 180;
    let to_lat = |px: i32| 90 - (f64::from(px) / pixels_per_degree + 0.5) as i32;
    let west = to_lon(left);
    let east = to_lon(right);
    let south = to_lat(bottom);
    let north = to_lat(top);

    let mut names = Vec::new();
    for lon in west..east {
        for lat in south..north {
            names.push(tile_name(lon, lat));
        }
    }
    names
}
