pub mod fetch;
pub mod index;
pub mod list;
pub mod tiles;

use anyhow::{Context, Result};
use hgtfetch::{Ring, Source};
use std::path::Path;

/// Parse the `--source` selections, preserving order.
pub fn parse_sources(sources: &[String]) -> Result<Vec<Source>> {
    sources
        .iter()
        .map(|s| s.parse::<Source>().map_err(anyhow::Error::msg))
        .collect()
}

/// Load polygon rings from a GeoJSON file holding a Polygon or
/// MultiPolygon (bare geometry, feature or feature collection).
pub fn load_polygon(path: &Path) -> Result<Vec<Ring>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read polygon file {}", path.display()))?;
    let geojson: geojson::GeoJson = text
        .parse()
        .with_context(|| format!("{} is not valid GeoJSON", path.display()))?;

    let mut rings = Vec::new();
    match geojson {
        geojson::GeoJson::Geometry(geometry) => {
            rings.extend(hgtfetch::geojson::polygon_rings(&geometry)?);
        }
        geojson::GeoJson::Feature(feature) => {
            let geometry = feature
                .geometry
                .context("polygon feature has no geometry")?;
            rings.extend(hgtfetch::geojson::polygon_rings(&geometry)?);
        }
        geojson::GeoJson::FeatureCollection(collection) => {
            for feature in collection.features {
                if let Some(geometry) = feature.geometry {
                    rings.extend(hgtfetch::geojson::polygon_rings(&geometry)?);
                }
            }
        }
    }

    anyhow::ensure!(
        !rings.is_empty(),
        "{} contains no polygon rings",
        path.display()
    );
    Ok(rings)
}
