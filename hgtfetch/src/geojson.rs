//! GeoJSON polygon input.
//!
//! Converts a GeoJSON geometry into the ring lists the selector consumes.
//! Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use geojson::Geometry;
//! use hgtfetch::geojson::polygon_rings;
//!
//! let geometry: Geometry =
//!     r#"{"type": "Polygon", "coordinates": [[[9.0, 19.0], [12.0, 19.0], [10.5, 22.0], [9.0, 19.0]]]}"#
//!         .parse()
//!         .unwrap();
//! let rings = polygon_rings(&geometry)?;
//! ```

use geojson::{Geometry, Value};

use crate::error::{FetchError, Result};
use crate::polygon::Ring;

/// Extract every ring of a Polygon, MultiPolygon or GeometryCollection
/// thereof, as (lon, lat) vertex lists.
///
/// Interior rings are returned alongside exterior ones: each ring
/// participates equally in the corner-containment count downstream.
pub fn polygon_rings(geometry: &Geometry) -> Result<Vec<Ring>> {
    let mut rings = Vec::new();
    collect_rings(&geometry.value, &mut rings)?;
    if rings.is_empty() {
        return Err(FetchError::Geometry {
            reason: "geometry contains no polygon rings".to_string(),
        });
    }
    Ok(rings)
}

fn collect_rings(value: &Value, rings: &mut Vec<Ring>) -> Result<()> {
    match value {
        Value::Polygon(polygon) => {
            for ring in polygon {
                rings.push(convert_ring(ring)?);
            }
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                for ring in polygon {
                    rings.push(convert_ring(ring)?);
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_rings(&geometry.value, rings)?;
            }
        }
        other => {
            return Err(FetchError::Geometry {
                reason: format!("{} geometry cannot restrict an area", other.type_name()),
            });
        }
    }
    Ok(())
}

fn convert_ring(ring: &[Vec<f64>]) -> Result<Ring> {
    ring.iter()
        .map(|position| match position[..] {
            [lon, lat, ..] => Ok((lon, lat)),
            _ => Err(FetchError::Geometry {
                reason: "position with fewer than 2 coordinates".to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(json: &str) -> Geometry {
        json.parse().unwrap()
    }

    #[test]
    fn test_polygon_rings() {
        let g = geometry(
            r#"{"type": "Polygon", "coordinates":
                [[[9.0, 19.0], [12.0, 19.0], [10.5, 22.0], [9.0, 19.0]]]}"#,
        );
        let rings = polygon_rings(&g).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0][0], (9.0, 19.0));
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn test_multipolygon_flattens_all_rings() {
        let g = geometry(
            r#"{"type": "MultiPolygon", "coordinates": [
                [[[0.0, 0.0], [2.0, 0.0], [1.0, 2.0], [0.0, 0.0]],
                 [[0.5, 0.5], [1.5, 0.5], [1.0, 1.0], [0.5, 0.5]]],
                [[[10.0, 10.0], [12.0, 10.0], [11.0, 12.0], [10.0, 10.0]]]
            ]}"#,
        );
        let rings = polygon_rings(&g).unwrap();
        assert_eq!(rings.len(), 3);
    }

    #[test]
    fn test_rejects_non_area_geometry() {
        let g = geometry(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#);
        assert!(matches!(
            polygon_rings(&g),
            Err(FetchError::Geometry { .. })
        ));
    }

    #[test]
    fn test_elevation_coordinate_is_ignored() {
        let g = geometry(
            r#"{"type": "Polygon", "coordinates":
                [[[9.0, 19.0, 120.0], [12.0, 19.0, 130.0], [10.5, 22.0, 140.0], [9.0, 19.0, 120.0]]]}"#,
        );
        let rings = polygon_rings(&g).unwrap();
        assert_eq!(rings[0][1], (12.0, 19.0));
    }
}
