use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// SRTM tile planning and download tool
#[derive(Parser)]
#[command(name = "hgtfetch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory for downloaded tiles and cached indices
    #[arg(
        short,
        long,
        env = "HGTFETCH_DATA_DIR",
        default_value = "hgt",
        global = true
    )]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every tile covering an area
    Fetch {
        /// Area as minLon:minLat:maxLon:maxLat
        #[arg(long)]
        area: String,

        /// GeoJSON file restricting the area to a polygon
        #[arg(long)]
        polygon: Option<PathBuf>,

        /// Sources to try per tile, in preference order
        #[arg(long = "source", default_value = "srtm3")]
        sources: Vec<String>,

        /// Longitude offset subtracted from all coordinates
        #[arg(long, default_value_t = 0.0)]
        corrx: f64,

        /// Latitude offset subtracted from all coordinates
        #[arg(long, default_value_t = 0.0)]
        corry: f64,
    },

    /// Show which tiles an area needs, without downloading
    Tiles {
        /// Area as minLon:minLat:maxLon:maxLat
        #[arg(long)]
        area: String,

        /// GeoJSON file restricting the area to a polygon
        #[arg(long)]
        polygon: Option<PathBuf>,

        /// Longitude offset subtracted from all coordinates
        #[arg(long, default_value_t = 0.0)]
        corrx: f64,

        /// Latitude offset subtracted from all coordinates
        #[arg(long, default_value_t = 0.0)]
        corry: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Rebuild the cached source indices
    Index {
        /// Specific source to rebuild (default: all four)
        #[arg(long)]
        source: Option<String>,
    },

    /// List downloaded tiles
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            area,
            polygon,
            sources,
            corrx,
            corry,
        } => commands::fetch::run(cli.data_dir, area, polygon, sources, corrx, corry),
        Commands::Tiles {
            area,
            polygon,
            corrx,
            corry,
            json,
        } => commands::tiles::run(area, polygon, corrx, corry, json),
        Commands::Index { source } => commands::index::run(cli.data_dir, source),
        Commands::List => commands::list::run(cli.data_dir),
    }
}
