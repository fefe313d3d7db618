use anyhow::{Context, Result};
use hgtfetch::{select_tiles, BoundingBox, Config, Fetcher, HttpListing};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use super::{load_polygon, parse_sources};

pub fn run(
    data_dir: PathBuf,
    area: String,
    polygon: Option<PathBuf>,
    sources: Vec<String>,
    corrx: f64,
    corry: f64,
) -> Result<()> {
    let cfg = Config::new(data_dir);
    let sources = parse_sources(&sources)?;
    let polygons = polygon.as_deref().map(load_polygon).transpose()?;

    let listing = HttpListing::new().context("failed to create HTTP client")?;
    let fetcher = Fetcher::new(&cfg, &listing).context("failed to create fetcher")?;
    fetcher.init_dirs(&sources)?;

    let bbox = BoundingBox::from_area(&area, corrx, corry)?;
    let picks = select_tiles(&bbox, polygons.as_deref(), corrx, corry);

    let pb = ProgressBar::new(picks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );

    let mut fetched = 0u64;
    let mut missing = Vec::new();
    for (name, _needs_check) in picks {
        pb.set_message(name.clone());
        match fetcher.fetch_tile(&name, &sources)? {
            Some(_) => fetched += 1,
            None => missing.push(name),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("Fetched {} tile(s) into {}", fetched, cfg.hgt_dir.display());
    if !missing.is_empty() {
        println!("Not available from any configured source:");
        for name in missing {
            println!("  {name}");
        }
    }
    Ok(())
}
