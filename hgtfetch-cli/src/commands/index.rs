use anyhow::{Context, Result};
use hgtfetch::{Config, HttpListing, IndexStore, Source};
use std::fs;
use std::path::PathBuf;

pub fn run(data_dir: PathBuf, source: Option<String>) -> Result<()> {
    let cfg = Config::new(data_dir);
    fs::create_dir_all(&cfg.hgt_dir)
        .with_context(|| format!("failed to create {}", cfg.hgt_dir.display()))?;

    let listing = HttpListing::new().context("failed to create HTTP client")?;
    let store = IndexStore::new(&cfg, &listing);

    match source {
        Some(source) => {
            let source: Source = source.parse().map_err(anyhow::Error::msg)?;
            store.regenerate(source)?;
            println!("Rebuilt index {}", cfg.index_path(source).display());
        }
        None => {
            store.regenerate_all()?;
            println!("Rebuilt all indices under {}", cfg.hgt_dir.display());
        }
    }
    Ok(())
}
