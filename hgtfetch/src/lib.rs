//! # hgtfetch - SRTM tile planning and retrieval
//!
//! Library for working out which 1°×1° SRTM elevation tiles cover a
//! requested area and where to download them from.
//!
//! ## Features
//!
//! - **Exact selection**: bounding boxes snap to whole-degree boundaries,
//!   and an optional polygon region is intersected with the tile grid
//!   edge by edge, so no tile is missed and fully-outside tiles are
//!   skipped
//! - **Cached indices**: what each remote source provides is recorded in
//!   versioned local index files, regenerated automatically when missing
//!   or stale
//! - **Source fallback**: tiles resolve against an ordered list of
//!   sources; the first one that provides a tile wins
//! - **Self-healing**: after an archive is unpacked, its index entry is
//!   reconciled with the tiles actually found inside
//!
//! ## Quick Start
//!
//! ```ignore
//! use hgtfetch::{Config, Fetcher, HttpListing, Source};
//!
//! let cfg = Config::new("hgt");
//! let listing = HttpListing::new()?;
//! let fetcher = Fetcher::new(&cfg, &listing)?;
//!
//! // Fetch every tile covering the area, preferring viewfinder data
//! let files = fetcher.fetch_area(
//!     "10:20:12:22",
//!     None,
//!     0.0,
//!     0.0,
//!     &[Source::VIEW3, Source::SRTM3],
//! )?;
//! for tile in files {
//!     println!("{} -> {}", tile.name, tile.path.display());
//! }
//! ```
//!
//! ## Tile names
//!
//! A tile is named by its integer southwest corner: hemisphere letters
//! plus zero-padded magnitudes, two digits of latitude and three of
//! longitude. Latitude 7, longitude −13 is `N07W013`.
//!
//! ## Index files
//!
//! Each source caches a flat text index under the storage root, e.g.
//!
//! ```text
//! # SRTM3 index file, VERSION=2
//! [Eurasia]
//! N35E138.hgt.zip
//! ```
//!
//! The header version is checked on every load; a mismatch with the
//! version this build requires triggers regeneration from the remote
//! listing before any data is returned.

pub mod area;
pub mod config;
pub mod error;
pub mod filename;
pub mod grid;
pub mod index;
pub mod listing;
pub mod polygon;
pub mod resolver;
pub mod source;

#[cfg(feature = "download")]
pub mod download;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use area::select_tiles;
pub use config::Config;
pub use error::{FetchError, Result};
pub use grid::BoundingBox;
pub use index::{Index, IndexStore};
pub use listing::{MapArea, RemoteListing};
pub use polygon::Ring;
pub use resolver::Resolver;
pub use source::{Resolution, Source, SourceKind};

#[cfg(feature = "download")]
pub use download::{FetchedTile, Fetcher};

#[cfg(feature = "download")]
pub use listing::HttpListing;
