//! Area tile selection.
//!
//! [`select_tiles`] turns a grid-aligned bounding box and an optional
//! polygon region into the ordered list of tiles to fetch. Each entry
//! carries a flag telling downstream consumers whether the tile only
//! partially overlaps the region and needs a precise polygon check before
//! its samples are used.

use tracing::debug;

use crate::filename::tile_name;
use crate::grid::BoundingBox;
use crate::polygon::{intersected_tiles, point_in_ring, Ring};

/// Enumerate every tile inside the bounding box, in ascending longitude
/// then ascending latitude, classifying each against the polygon region:
///
/// - a tile crossed by a polygon edge is included and flagged,
/// - a tile with all four corners inside the region is included unflagged,
/// - a tile with no corner inside is excluded,
/// - anything ambiguous is included and flagged.
///
/// With no polygons every tile in the box is included unflagged. A box
/// with `min_lon > max_lon` wraps the antimeridian and enumerates the two
/// longitude sub-ranges `[min_lon, 180)` and `[-180, max_lon)`.
pub fn select_tiles(
    bbox: &BoundingBox,
    polygons: Option<&[Ring]>,
    corrx: f64,
    corry: f64,
) -> Vec<(String, bool)> {
    let crossed = polygons
        .map(|rings| intersected_tiles(rings, corrx, corry))
        .unwrap_or_default();

    let lons: Vec<i32> = if bbox.wraps_antimeridian() {
        (bbox.min_lon..180).chain(-180..bbox.max_lon).collect()
    } else {
        (bbox.min_lon..bbox.max_lon).collect()
    };

    let mut tiles = Vec::new();
    for &lon in &lons {
        for lat in bbox.min_lat..bbox.max_lat {
            let name = tile_name(lon, lat);
            if crossed.contains(&name) {
                tiles.push((name, true));
            } else {
                let (needed, check) = area_needed(lon, lat, bbox, polygons, corrx, corry);
                if needed {
                    tiles.push((name, check));
                }
            }
        }
    }
    tiles
}

/// Classify one tile that no polygon edge crosses. Returns
/// (needed, needs polygon check).
fn area_needed(
    lon: i32,
    lat: i32,
    bbox: &BoundingBox,
    polygons: Option<&[Ring]>,
    corrx: f64,
    corry: f64,
) -> (bool, bool) {
    let Some(polygons) = polygons else {
        return (true, false);
    };

    debug!(
        "checking if area {} intersects with the polygon",
        tile_name(lon, lat)
    );

    // The bounding box degenerates to this one tile: it is the whole
    // requested area by construction, keep it and let the consumer clip.
    if lon == bbox.min_lon
        && lat == bbox.min_lat
        && lon + 1 == bbox.max_lon
        && lat + 1 == bbox.max_lat
    {
        return (true, true);
    }

    let min_lon = f64::from(lon) + corrx;
    let min_lat = f64::from(lat) + corry;
    let corners = [
        (min_lon, min_lat),
        (min_lon, min_lat + 1.0),
        (min_lon + 1.0, min_lat),
        (min_lon + 1.0, min_lat + 1.0),
    ];
    let inside = corners.map(|(x, y)| polygons.iter().filter(|ring| point_in_ring(x, y, ring)).count());

    if inside.iter().all(|&count| count > 0) {
        (true, false)
    } else if inside.iter().all(|&count| count == 0) {
        (false, false)
    } else {
        // A ring vertex sitting exactly on the tile border makes the
        // containment test unreliable; include the tile and let the
        // precise check decide.
        (true, true)
    }
}
