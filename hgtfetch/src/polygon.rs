//! Polygon / grid intersection.
//!
//! [`intersected_tiles`] walks every polygon edge and collects the tiles
//! whose cell boundary the edge crosses. Tiles in this set cannot be
//! classified by corner containment alone, so the selector flags them for
//! a precise polygon check downstream.
//!
//! At a crossing that lands exactly on a grid corner there is no single
//! correct cell, so both cells adjacent to every crossing are marked. The
//! over-approximation only sends a few extra tiles down the cheap
//! precise-check path; it never loses one.

use std::collections::HashSet;

use crate::filename::tile_name;
use crate::grid::{grid_floor, grid_range};

/// A polygon ring: (lon, lat) vertices, closed (last repeats first).
pub type Ring = Vec<(f64, f64)>;

/// Names of all tiles whose cell boundary is crossed by any edge of any
/// of the given rings, after subtracting the coordinate offset.
pub fn intersected_tiles(polygons: &[Ring], corrx: f64, corry: f64) -> HashSet<String> {
    let mut cells: HashSet<(i32, i32)> = HashSet::new();
    for ring in polygons {
        let mut vertices = ring.iter().map(|&(x, y)| (x - corrx, y - corry));
        let Some((mut x_last, mut y_last)) = vertices.next() else {
            continue;
        };
        for (x, y) in vertices {
            cells.insert((grid_floor(x), grid_floor(y)));
            if x == x_last {
                // vertical edge: mark the cell north of every crossed latitude line
                for lat in grid_range(y, y_last) {
                    cells.insert((grid_floor(x), lat));
                }
            } else if y == y_last {
                // horizontal edge
                for lon in grid_range(x, x_last) {
                    cells.insert((lon, grid_floor(y)));
                }
            } else {
                // sloped edge y = s·x + o: mark both cells at every grid-line crossing
                let s = (y - y_last) / (x - x_last);
                let o = y_last - x_last * s;
                for lon in grid_range(x, x_last) {
                    let lat = grid_floor(s * f64::from(lon) + o);
                    cells.insert((lon - 1, lat));
                    cells.insert((lon, lat));
                }
                for lat in grid_range(y, y_last) {
                    let lon = grid_floor((f64::from(lat) - o) / s);
                    cells.insert((lon, lat - 1));
                    cells.insert((lon, lat));
                }
            }
            x_last = x;
            y_last = y;
        }
    }
    cells
        .into_iter()
        .map(|(lon, lat)| tile_name(lon, lat))
        .collect()
}

/// Even-odd ray-cast containment test of a point against one ring.
///
/// A point exactly on a ring edge or vertex gives no reliable answer;
/// callers treat such tiles conservatively.
pub fn point_in_ring(lon: f64, lat: f64, ring: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &HashSet<String>) -> Vec<String> {
        let mut v: Vec<String> = set.iter().cloned().collect();
        v.sort();
        v
    }

    #[test]
    fn test_point_in_ring_square() {
        let square = vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)];
        assert!(point_in_ring(1.0, 1.0, &square));
        assert!(!point_in_ring(3.0, 1.0, &square));
        assert!(!point_in_ring(-0.5, 1.0, &square));
        assert!(!point_in_ring(1.0, 2.5, &square));
    }

    #[test]
    fn test_point_in_ring_concave() {
        // L-shape: the notch around (1.5, 1.5) is outside
        let ell = vec![
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ];
        assert!(point_in_ring(0.5, 1.5, &ell));
        assert!(point_in_ring(1.5, 0.5, &ell));
        assert!(!point_in_ring(1.5, 1.5, &ell));
    }

    #[test]
    fn test_polygon_inside_one_cell() {
        let triangle = vec![(10.2, 20.2), (10.8, 20.2), (10.5, 20.8), (10.2, 20.2)];
        let set = intersected_tiles(&[triangle], 0.0, 0.0);
        assert_eq!(names(&set), vec!["N20E010"]);
    }

    #[test]
    fn test_vertical_edge_crossings() {
        let spike = vec![(0.5, -0.5), (0.5, 2.5), (0.5, -0.5)];
        let set = intersected_tiles(&[spike], 0.0, 0.0);
        assert_eq!(
            names(&set),
            vec!["N00E000", "N01E000", "N02E000", "S01E000"]
        );
    }

    #[test]
    fn test_horizontal_edge_crossings() {
        let spike = vec![(-0.5, 0.5), (2.5, 0.5), (-0.5, 0.5)];
        let set = intersected_tiles(&[spike], 0.0, 0.0);
        assert_eq!(
            names(&set),
            vec!["N00E000", "N00E001", "N00E002", "N00W001"]
        );
    }

    #[test]
    fn test_corner_crossing_marks_both_sides() {
        // diagonal through the grid corner at (0, 0)
        let edge = vec![(-0.5, -0.5), (0.5, 0.5), (-0.5, -0.5)];
        let set = intersected_tiles(&[edge], 0.0, 0.0);
        assert_eq!(
            names(&set),
            vec!["N00E000", "N00W001", "S01E000", "S01W001"]
        );
    }

    #[test]
    fn test_offset_shifts_cells() {
        let triangle = vec![(10.2, 20.2), (10.8, 20.2), (10.5, 20.8), (10.2, 20.2)];
        let set = intersected_tiles(&[triangle], 10.0, 20.0);
        assert_eq!(names(&set), vec!["N00E000"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(intersected_tiles(&[], 0.0, 0.0).is_empty());
        assert!(intersected_tiles(&[vec![]], 0.0, 0.0).is_empty());
    }
}
