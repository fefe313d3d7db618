//! Data sources and resolution tiers.
//!
//! A [`Source`] names one of the four places a tile can come from: the
//! global SRTM archive server or the viewfinderpanoramas coverage maps,
//! each at 1 or 3 arc-second resolution. The source determines the layout
//! of its cached index, the index schema version the code requires, the
//! on-disk subdirectory for downloaded tiles, and the expected payload
//! size.

use std::fmt;
use std::str::FromStr;

/// Resolution tier of the elevation samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 1 arc-second (~30m) samples.
    Arc1,
    /// 3 arc-second (~90m) samples.
    Arc3,
}

impl Resolution {
    /// Sample spacing in arc-seconds.
    pub fn arc_seconds(self) -> u32 {
        match self {
            Resolution::Arc1 => 1,
            Resolution::Arc3 => 3,
        }
    }

    /// Number of samples per row/column of a 1°×1° tile.
    pub fn samples(self) -> u32 {
        3600 / self.arc_seconds() + 1
    }

    /// Exact byte size of a correctly sized `.hgt` payload at this
    /// resolution: two bytes per sample over a samples × samples grid.
    pub fn expected_hgt_size(self) -> u64 {
        let samples = u64::from(self.samples());
        2 * samples * samples
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arc_seconds())
    }
}

/// Which archive a tile is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The global SRTM archive server, organized by category directories.
    Srtm,
    /// The viewfinderpanoramas archives, organized by coverage-map regions.
    View,
}

/// A (kind, resolution) source selector such as `srtm3` or `view1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Source {
    pub kind: SourceKind,
    pub resolution: Resolution,
}

impl Source {
    pub const SRTM1: Source = Source {
        kind: SourceKind::Srtm,
        resolution: Resolution::Arc1,
    };
    pub const SRTM3: Source = Source {
        kind: SourceKind::Srtm,
        resolution: Resolution::Arc3,
    };
    pub const VIEW1: Source = Source {
        kind: SourceKind::View,
        resolution: Resolution::Arc1,
    };
    pub const VIEW3: Source = Source {
        kind: SourceKind::View,
        resolution: Resolution::Arc3,
    };

    /// Every supported source.
    pub const ALL: [Source; 4] = [Source::SRTM1, Source::SRTM3, Source::VIEW1, Source::VIEW3];

    /// Index schema version this build requires for the source. An on-disk
    /// index with any other version is stale and regenerated before use.
    pub fn index_version(self) -> u32 {
        match (self.kind, self.resolution) {
            (SourceKind::Srtm, Resolution::Arc1) => 1,
            (SourceKind::Srtm, Resolution::Arc3) => 2,
            (SourceKind::View, Resolution::Arc1) => 1,
            (SourceKind::View, Resolution::Arc3) => 2,
        }
    }

    /// Subdirectory under the storage root where this source's tiles are
    /// cached. Doubles as the label in index file headers.
    pub fn subdir(self) -> &'static str {
        match (self.kind, self.resolution) {
            (SourceKind::Srtm, Resolution::Arc1) => "SRTM1",
            (SourceKind::Srtm, Resolution::Arc3) => "SRTM3",
            (SourceKind::View, Resolution::Arc1) => "VIEW1",
            (SourceKind::View, Resolution::Arc3) => "VIEW3",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SourceKind::Srtm => "srtm",
            SourceKind::View => "view",
        };
        write!(f, "{}{}", kind, self.resolution)
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "srtm1" => Ok(Source::SRTM1),
            "srtm3" => Ok(Source::SRTM3),
            "view1" => Ok(Source::VIEW1),
            "view3" => Ok(Source::VIEW3),
            other => Err(format!(
                "unknown source {other:?} (expected srtm1, srtm3, view1 or view3)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_sizes() {
        // 2 × (3600/res + 1)²
        assert_eq!(Resolution::Arc1.expected_hgt_size(), 25_934_402);
        assert_eq!(Resolution::Arc3.expected_hgt_size(), 2_884_802);
    }

    #[test]
    fn test_samples() {
        assert_eq!(Resolution::Arc1.samples(), 3601);
        assert_eq!(Resolution::Arc3.samples(), 1201);
    }

    #[test]
    fn test_index_versions() {
        assert_eq!(Source::SRTM1.index_version(), 1);
        assert_eq!(Source::SRTM3.index_version(), 2);
        assert_eq!(Source::VIEW1.index_version(), 1);
        assert_eq!(Source::VIEW3.index_version(), 2);
    }

    #[test]
    fn test_parse_and_display() {
        for source in Source::ALL {
            let roundtrip: Source = source.to_string().parse().unwrap();
            assert_eq!(roundtrip, source);
        }
        assert!("srtm9".parse::<Source>().is_err());
        assert!("".parse::<Source>().is_err());
    }

    #[test]
    fn test_subdirs() {
        assert_eq!(Source::SRTM3.subdir(), "SRTM3");
        assert_eq!(Source::VIEW1.subdir(), "VIEW1");
    }
}
