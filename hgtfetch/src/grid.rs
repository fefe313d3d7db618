//! Integer degree-grid utilities.
//!
//! Tile boundaries sit on whole-degree lines, so every selection starts by
//! snapping real-valued coordinates to the enclosing integer grid. Lower
//! bounds snap down, upper bounds snap up, and a coordinate already on a
//! grid line stays put — an area ending exactly on a degree line must not
//! pull in the tile beyond it.

use std::ops::Range;

use crate::error::{FetchError, Result};

/// Greatest integer grid line at or below `x`.
pub fn grid_floor(x: f64) -> i32 {
    x.floor() as i32
}

/// Smallest integer grid line at or above `x`.
pub fn grid_ceil(x: f64) -> i32 {
    x.ceil() as i32
}

/// Ascending range of integer grid lines inside the span of the two
/// (possibly unordered) reals: both ends are snapped up, so an integral
/// lower endpoint is included and an integral upper endpoint is not.
/// Used to enumerate which grid lines a polygon edge crosses.
pub fn grid_range(a: f64, b: f64) -> Range<i32> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    grid_ceil(lo)..grid_ceil(hi)
}

/// A grid-aligned half-open bounding box in whole degrees.
///
/// `min_lon > max_lon` signals a box wrapping the ±180° meridian;
/// `min_lat < max_lat` always holds for non-empty areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_lon: i32,
    pub min_lat: i32,
    pub max_lon: i32,
    pub max_lat: i32,
}

impl BoundingBox {
    /// Parse an area specification `minLon:minLat:maxLon:maxLat` of four
    /// colon-separated real numbers, subtract the coordinate offset, and
    /// expand outward to whole-degree boundaries.
    pub fn from_area(area: &str, corrx: f64, corry: f64) -> Result<Self> {
        let parts: Vec<f64> = area
            .split(':')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| FetchError::AreaFormat {
                spec: area.to_string(),
            })?;
        let [min_lon, min_lat, max_lon, max_lat] = parts[..] else {
            return Err(FetchError::AreaFormat {
                spec: area.to_string(),
            });
        };
        Ok(Self {
            min_lon: grid_floor(min_lon - corrx),
            min_lat: grid_floor(min_lat - corry),
            max_lon: grid_ceil(max_lon - corrx),
            max_lat: grid_ceil(max_lat - corry),
        })
    }

    /// Whether the box wraps the ±180° meridian.
    pub fn wraps_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_floor_ceil() {
        assert_eq!(grid_floor(2.7), 2);
        assert_eq!(grid_floor(-2.7), -3);
        assert_eq!(grid_floor(2.0), 2);
        assert_eq!(grid_floor(-2.0), -2);
        assert_eq!(grid_ceil(2.3), 3);
        assert_eq!(grid_ceil(-2.3), -2);
        assert_eq!(grid_ceil(2.0), 2);
        assert_eq!(grid_ceil(-2.0), -2);
    }

    #[test]
    fn test_grid_range() {
        assert_eq!(grid_range(0.5, 2.5).collect::<Vec<_>>(), vec![1, 2]);
        // unordered endpoints sort first
        assert_eq!(grid_range(2.5, 0.5).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(grid_range(-1.5, 0.5).collect::<Vec<_>>(), vec![-1, 0]);
        // no grid line inside the span
        assert_eq!(grid_range(0.2, 0.8).count(), 0);
        // integral lower endpoint is included, integral upper is not
        assert_eq!(grid_range(0.0, 2.0).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_bbox_integral_area_is_identity() {
        let bbox = BoundingBox::from_area("10:20:12:22", 0.0, 0.0).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_lon: 10,
                min_lat: 20,
                max_lon: 12,
                max_lat: 22
            }
        );
    }

    #[test]
    fn test_bbox_expands_outward() {
        let bbox = BoundingBox::from_area("9.5:19.5:10.5:20.5", 0.0, 0.0).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_lon: 9,
                min_lat: 19,
                max_lon: 11,
                max_lat: 21
            }
        );
    }

    #[test]
    fn test_bbox_around_origin() {
        let bbox = BoundingBox::from_area("-1:-1:1:1", 0.0, 0.0).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_lon: -1,
                min_lat: -1,
                max_lon: 1,
                max_lat: 1
            }
        );
        let bbox = BoundingBox::from_area("-0.5:-0.5:0.5:0.5", 0.0, 0.0).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_lon: -1,
                min_lat: -1,
                max_lon: 1,
                max_lat: 1
            }
        );
    }

    #[test]
    fn test_bbox_offset_subtracted() {
        let bbox = BoundingBox::from_area("10:20:12:22", 0.5, 0.25).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_lon: 9,
                min_lat: 19,
                max_lon: 12,
                max_lat: 22
            }
        );
    }

    #[test]
    fn test_bbox_wraparound_flag() {
        let bbox = BoundingBox::from_area("179:0:-179:1", 0.0, 0.0).unwrap();
        assert!(bbox.wraps_antimeridian());
        let bbox = BoundingBox::from_area("10:20:12:22", 0.0, 0.0).unwrap();
        assert!(!bbox.wraps_antimeridian());
    }

    #[test]
    fn test_bbox_bad_specs() {
        for spec in ["", "1:2:3", "1:2:3:4:5", "a:b:c:d", "1:2:3:x"] {
            assert!(
                matches!(
                    BoundingBox::from_area(spec, 0.0, 0.0),
                    Err(FetchError::AreaFormat { .. })
                ),
                "spec {spec:?} should fail"
            );
        }
    }
}
