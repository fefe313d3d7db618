//! Basic example demonstrating tile selection.
//!
//! Run with: cargo run --example select -- 10:20:12:22

use hgtfetch::{select_tiles, BoundingBox, FetchError};
use std::env;

fn main() -> Result<(), FetchError> {
    let area = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example select -- minLon:minLat:maxLon:maxLat");
        std::process::exit(1);
    });

    let bbox = BoundingBox::from_area(&area, 0.0, 0.0)?;
    println!(
        "Bounding box: {}..{} lon, {}..{} lat",
        bbox.min_lon, bbox.max_lon, bbox.min_lat, bbox.max_lat
    );

    // A polygon restricting the area to roughly its lower-left triangle
    let ring = vec![
        (f64::from(bbox.min_lon), f64::from(bbox.min_lat)),
        (f64::from(bbox.max_lon), f64::from(bbox.min_lat)),
        (f64::from(bbox.min_lon), f64::from(bbox.max_lat)),
        (f64::from(bbox.min_lon), f64::from(bbox.min_lat)),
    ];
    let rings = [ring];

    println!("\nWithout polygon:");
    for (name, _) in select_tiles(&bbox, None, 0.0, 0.0) {
        println!("  {name}");
    }

    println!("\nRestricted to the lower-left triangle:");
    for (name, needs_check) in select_tiles(&bbox, Some(&rings), 0.0, 0.0) {
        let suffix = if needs_check { " (needs polygon check)" } else { "" };
        println!("  {name}{suffix}");
    }

    Ok(())
}
