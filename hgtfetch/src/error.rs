//! Error types for the hgtfetch library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while selecting, resolving or fetching tiles.
#[derive(Error, Debug)]
pub enum FetchError {
    /// IO error when reading or writing local files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The area specification did not parse into four real numbers.
    #[error("invalid area specification {spec:?} (expected minLon:minLat:maxLon:maxLat)")]
    AreaFormat { spec: String },

    /// A remote listing needed to (re)generate an index could not be fetched.
    #[error("index source {what} unavailable: {reason}")]
    IndexUnavailable { what: String, reason: String },

    /// An index file still carries the wrong schema version after regeneration.
    #[error("index {path} has version {found}, expected {expected}")]
    IndexVersion {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    /// No configured source provides the requested tile.
    #[error("tile {name} not available from any configured source")]
    TileNotFound { name: String },

    /// A cached payload does not have the size mandated by its resolution.
    #[error("{path}: wrong size: expected {expected}, found {found}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    /// HTTP transport error while downloading.
    #[cfg(feature = "download")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A download did not complete successfully.
    #[cfg(feature = "download")]
    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    /// A fetched archive could not be read or unpacked.
    #[cfg(feature = "download")]
    #[error("{path}: unusable archive: {reason}")]
    Archive { path: PathBuf, reason: String },

    /// A GeoJSON geometry cannot be converted into polygon rings.
    #[cfg(feature = "geojson")]
    #[error("unsupported polygon geometry: {reason}")]
    Geometry { reason: String },
}

/// Result type alias using [`FetchError`].
pub type Result<T> = std::result::Result<T, FetchError>;
