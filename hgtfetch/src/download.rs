//! Tile download and extraction.
//!
//! This module is the collaborator layer around the core: once the
//! selector has named the tiles and the resolver has produced URLs, a
//! [`Fetcher`] downloads the archives, unpacks their `.hgt` members into
//! the per-source cache directory and verifies payload sizes. It is only
//! available when the `download` feature is enabled.
//!
//! A tile that fails to download or unpack is logged and skipped; the
//! batch continues with the next source or the next tile. Only structural
//! problems (unreachable listings, unreadable indices, filesystem errors
//! other than "not found") abort a run.

use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{info, warn};
use zip::ZipArchive;

use crate::area::select_tiles;
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::grid::BoundingBox;
use crate::index::IndexStore;
use crate::listing::RemoteListing;
use crate::polygon::Ring;
use crate::resolver::Resolver;
use crate::source::{Source, SourceKind};

/// Default timeout for archive downloads in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A tile that was fetched (or found already cached) successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedTile {
    /// Canonical tile name.
    pub name: String,
    /// Local path of the `.hgt` payload.
    pub path: PathBuf,
    /// Whether the tile only partially overlaps the requested region and
    /// needs a precise polygon check downstream.
    pub needs_poly_check: bool,
}

/// Downloads and unpacks tile archives resolved through the indices.
pub struct Fetcher<'a> {
    cfg: &'a Config,
    listing: &'a dyn RemoteListing,
    client: Client,
}

impl<'a> Fetcher<'a> {
    pub fn new(cfg: &'a Config, listing: &'a dyn RemoteListing) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Download {
                url: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            cfg,
            listing,
            client,
        })
    }

    /// Create the storage root and one cache subdirectory per source.
    pub fn init_dirs(&self, sources: &[Source]) -> Result<()> {
        fs::create_dir_all(&self.cfg.hgt_dir)?;
        for &source in sources {
            fs::create_dir_all(self.cfg.cache_dir(source))?;
        }
        Ok(())
    }

    /// Fetch every tile covering the area, trying the sources in order
    /// for each tile. Tiles no source provides are logged and omitted
    /// from the result.
    pub fn fetch_area(
        &self,
        area: &str,
        polygons: Option<&[Ring]>,
        corrx: f64,
        corry: f64,
        sources: &[Source],
    ) -> Result<Vec<FetchedTile>> {
        self.init_dirs(sources)?;
        let bbox = BoundingBox::from_area(area, corrx, corry)?;
        let mut fetched = Vec::new();
        for (name, needs_poly_check) in select_tiles(&bbox, polygons, corrx, corry) {
            match self.fetch_tile(&name, sources)? {
                Some(path) => fetched.push(FetchedTile {
                    name,
                    path,
                    needs_poly_check,
                }),
                None => warn!(
                    "{}",
                    FetchError::TileNotFound {
                        name: name.clone()
                    }
                ),
            }
        }
        Ok(fetched)
    }

    /// Fetch one tile, trying each source in order. `Ok(None)` means no
    /// source provided a usable payload.
    pub fn fetch_tile(&self, name: &str, sources: &[Source]) -> Result<Option<PathBuf>> {
        let resolver = Resolver::new(self.cfg, self.listing);
        for &source in sources {
            info!("{name}: trying {source}");
            let Some(url) = resolver.resolve(name, source)? else {
                continue;
            };
            if let Some(path) = self.download_and_unzip(&url, name, source)? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Produce `<cache dir>/<NAME>.hgt` from an archive URL: reuse an
    /// existing correctly-sized payload, otherwise unpack a cached or
    /// freshly downloaded archive, then verify the size. A wrong-sized or
    /// missing result is treated as absent and the tile skipped.
    fn download_and_unzip(&self, url: &str, name: &str, source: Source) -> Result<Option<PathBuf>> {
        let cache_dir = self.cfg.cache_dir(source);
        let archive_name = url.rsplit('/').next().unwrap_or(url);
        let archive_path = cache_dir.join(archive_name);
        let hgt_path = cache_dir.join(format!("{name}.hgt"));
        let wanted = source.resolution.expected_hgt_size();

        match file_size(&hgt_path)? {
            Some(found) if found == wanted => {
                info!("{name}: using existing file {}", hgt_path.display());
                return Ok(Some(hgt_path));
            }
            Some(found) => {
                let err = FetchError::SizeMismatch {
                    path: hgt_path.clone(),
                    expected: wanted,
                    found,
                };
                warn!("{name}: {err}, refetching");
            }
            None => {}
        }

        if file_size(&archive_path)?.is_none() {
            info!("{name}: downloading {url} to {}", archive_path.display());
            if let Err(e) = self.download(url, &archive_path) {
                warn!("{name}: {e}");
                return Ok(None);
            }
        }

        let members = match unzip_archive(&archive_path) {
            Ok(members) => members,
            Err(e) => {
                warn!("{name}: file {} from {url} is not a usable archive: {e}", archive_path.display());
                return Ok(None);
            }
        };

        if source.kind == SourceKind::View {
            let store = IndexStore::new(self.cfg, self.listing);
            store.reconcile_view(source.resolution, url, &members)?;
            if !store.load(source)?.contains(name) {
                // the archive is now known not to contain this tile
                return Ok(None);
            }
        }

        match file_size(&hgt_path)? {
            Some(found) if found == wanted => {
                info!("{name}: using file {}", hgt_path.display());
                Ok(Some(hgt_path))
            }
            Some(found) => {
                let err = FetchError::SizeMismatch {
                    path: hgt_path,
                    expected: wanted,
                    found,
                };
                warn!("{name}: {err}");
                Ok(None)
            }
            None => {
                warn!("{name}: archive {archive_name} did not contain {name}.hgt");
                Ok(None)
            }
        }
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(FetchError::Download {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        let bytes = response.bytes()?;
        fs::write(dest, &bytes)?;
        Ok(())
    }
}

/// Extract every `.hgt` member of the archive next to it, named by its
/// upper-cased stem, then delete the archive. Returns the extracted tile
/// names.
fn unzip_archive(archive_path: &Path) -> Result<Vec<String>> {
    let archive_err = |reason: String| FetchError::Archive {
        path: archive_path.to_path_buf(),
        reason,
    };

    info!("unzipping file {}", archive_path.display());
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| archive_err(e.to_string()))?;
    let dest_dir = archive_path.parent().unwrap_or(Path::new("")).to_path_buf();

    let mut names = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| archive_err(e.to_string()))?;
        let member = entry.name().to_string();
        let base = member.rsplit(['/', '\\']).next().unwrap_or(&member);
        if !base.to_lowercase().ends_with(".hgt") {
            continue;
        }
        let stem = base[..base.len() - 4].trim().to_uppercase();
        if stem.is_empty() {
            continue;
        }
        let mut out = File::create(dest_dir.join(format!("{stem}.hgt")))?;
        io::copy(&mut entry, &mut out)?;
        names.push(stem);
    }

    drop(archive);
    fs::remove_file(archive_path)?;
    Ok(names)
}

/// Size of a file, `None` if it does not exist. Other failures (such as
/// permission problems) propagate so callers never mistake them for a
/// missing file.
fn file_size(path: &Path) -> Result<Option<u64>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.len())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::MapArea;
    use std::io::Write;

    struct NoListing;

    impl RemoteListing for NoListing {
        fn archive_names(&self, url: &str) -> Result<Vec<String>> {
            Err(FetchError::IndexUnavailable {
                what: url.to_string(),
                reason: "offline test".to_string(),
            })
        }

        fn coverage_areas(&self, url: &str) -> Result<Vec<MapArea>> {
            Err(FetchError::IndexUnavailable {
                what: url.to_string(),
                reason: "offline test".to_string(),
            })
        }
    }

    fn make_zip(path: &Path, members: &[(&str, usize)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (member, size) in members {
            zip.start_file(*member, options).unwrap();
            zip.write_all(&vec![0u8; *size]).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_unzip_extracts_hgt_members_and_removes_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("L36.zip");
        make_zip(
            &archive_path,
            &[
                ("N36E000.hgt", 100),
                ("subdir/n36e001.hgt", 50),
                ("readme.txt", 10),
            ],
        );

        let names = unzip_archive(&archive_path).unwrap();
        assert_eq!(names, vec!["N36E000", "N36E001"]);
        assert!(dir.path().join("N36E000.hgt").exists());
        assert!(dir.path().join("N36E001.hgt").exists());
        assert!(!dir.path().join("readme.txt").exists());
        assert!(!archive_path.exists(), "archive should be removed");
    }

    #[test]
    fn test_unzip_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("bogus.zip");
        fs::write(&archive_path, b"this is no zip file").unwrap();

        let err = unzip_archive(&archive_path).unwrap_err();
        assert!(matches!(err, FetchError::Archive { .. }));
        // a bad archive stays in place
        assert!(archive_path.exists());
    }

    #[test]
    fn test_file_size_distinguishes_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe");
        assert_eq!(file_size(&path).unwrap(), None);
        fs::write(&path, b"1234").unwrap();
        assert_eq!(file_size(&path).unwrap(), Some(4));
    }

    #[test]
    fn test_existing_correct_payload_is_reused_offline() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::new(dir.path());
        let fetcher = Fetcher::new(&cfg, &NoListing).unwrap();
        fetcher.init_dirs(&[Source::SRTM3]).unwrap();

        let hgt_path = cfg.cache_dir(Source::SRTM3).join("N35E138.hgt");
        fs::write(
            &hgt_path,
            vec![0u8; Source::SRTM3.resolution.expected_hgt_size() as usize],
        )
        .unwrap();

        // the URL is never contacted: the cached payload satisfies the call
        let got = fetcher
            .download_and_unzip(
                "http://invalid.invalid/Eurasia/N35E138.hgt.zip",
                "N35E138",
                Source::SRTM3,
            )
            .unwrap();
        assert_eq!(got, Some(hgt_path));
    }

    #[test]
    fn test_cached_archive_is_unpacked_offline() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::new(dir.path());
        let fetcher = Fetcher::new(&cfg, &NoListing).unwrap();
        fetcher.init_dirs(&[Source::SRTM3]).unwrap();

        let size = Source::SRTM3.resolution.expected_hgt_size() as usize;
        make_zip(
            &cfg.cache_dir(Source::SRTM3).join("N35E138.hgt.zip"),
            &[("N35E138.hgt", size)],
        );

        let got = fetcher
            .download_and_unzip(
                "http://invalid.invalid/Eurasia/N35E138.hgt.zip",
                "N35E138",
                Source::SRTM3,
            )
            .unwrap();
        assert_eq!(got, Some(cfg.cache_dir(Source::SRTM3).join("N35E138.hgt")));
    }

    #[test]
    fn test_wrong_sized_extraction_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::new(dir.path());
        let fetcher = Fetcher::new(&cfg, &NoListing).unwrap();
        fetcher.init_dirs(&[Source::SRTM3]).unwrap();

        make_zip(
            &cfg.cache_dir(Source::SRTM3).join("N35E138.hgt.zip"),
            &[("N35E138.hgt", 128)],
        );

        let got = fetcher
            .download_and_unzip(
                "http://invalid.invalid/Eurasia/N35E138.hgt.zip",
                "N35E138",
                Source::SRTM3,
            )
            .unwrap();
        assert_eq!(got, None);
    }
}
