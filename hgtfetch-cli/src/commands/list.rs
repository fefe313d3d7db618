use anyhow::{Context, Result};
use hgtfetch::filename::parse_tile_name;
use hgtfetch::{Config, Source};
use std::fs;
use std::path::PathBuf;

pub fn run(data_dir: PathBuf) -> Result<()> {
    let cfg = Config::new(data_dir);
    if !cfg.hgt_dir.exists() {
        anyhow::bail!("Data directory does not exist: {}", cfg.hgt_dir.display());
    }

    println!("{:<10} {:<8} {:>22} {:>10}", "TILE", "SOURCE", "COVERAGE", "STATUS");
    println!("{}", "-".repeat(54));

    let mut total = 0usize;
    let mut bad = 0usize;
    for source in Source::ALL {
        let dir = cfg.cache_dir(source);
        if !dir.exists() {
            continue;
        }

        let mut tiles: Vec<_> = fs::read_dir(&dir)
            .with_context(|| format!("failed to read {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext == "hgt")
                    .unwrap_or(false)
            })
            .collect();
        tiles.sort_by_key(|entry| entry.file_name());

        for entry in tiles {
            let filename = entry.file_name();
            let filename = filename.to_string_lossy();
            let stem = filename.trim_end_matches(".hgt");

            let coverage = match parse_tile_name(&filename) {
                Some((lon, lat)) => format!("{lon}..{} lon, {lat}..{} lat", lon + 1, lat + 1),
                None => "?".to_string(),
            };

            let size = fs::metadata(entry.path()).map(|m| m.len()).unwrap_or(0);
            let status = if size == source.resolution.expected_hgt_size() {
                "ok"
            } else {
                bad += 1;
                "bad size"
            };

            println!("{stem:<10} {:<8} {coverage:>22} {status:>10}", source.subdir());
            total += 1;
        }
    }

    println!("{}", "-".repeat(54));
    println!("{total} tile(s), {bad} with unexpected size");
    Ok(())
}
