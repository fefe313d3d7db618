use anyhow::Result;
use hgtfetch::{select_tiles, BoundingBox};
use serde::Serialize;
use std::path::PathBuf;

use super::load_polygon;

#[derive(Serialize)]
struct TileRow {
    name: String,
    needs_polygon_check: bool,
}

pub fn run(
    area: String,
    polygon: Option<PathBuf>,
    corrx: f64,
    corry: f64,
    json: bool,
) -> Result<()> {
    let polygons = polygon.as_deref().map(load_polygon).transpose()?;
    let bbox = BoundingBox::from_area(&area, corrx, corry)?;

    let rows: Vec<TileRow> = select_tiles(&bbox, polygons.as_deref(), corrx, corry)
        .into_iter()
        .map(|(name, needs_polygon_check)| TileRow {
            name,
            needs_polygon_check,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<10} {}", "TILE", "POLYGON CHECK");
    println!("{}", "-".repeat(24));
    for row in &rows {
        println!(
            "{:<10} {}",
            row.name,
            if row.needs_polygon_check { "yes" } else { "no" }
        );
    }
    println!("{} tile(s)", rows.len());
    Ok(())
}
