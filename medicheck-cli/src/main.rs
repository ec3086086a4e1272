use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

/// Nearby hospital lookup CLI tool
#[derive(Parser)]
#[command(name = "medicheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Google API key for Geocoding and Places
    #[arg(long, env = "GOOGLE_PLACES_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    Text,
    /// Same JSON shape as the HTTP API
    Json,
    /// GeoJSON FeatureCollection
    Geojson,
}

#[derive(Subcommand)]
enum Commands {
    /// Find hospitals near a city or ZIP code
    Nearby {
        /// City or ZIP code
        query: String,

        /// Maximum hospitals to list (1-100)
        #[arg(short, long, env = "PLACES_MAX_RESULTS", default_value = "25")]
        limit: usize,

        /// Search radius in meters (1000-80000)
        #[arg(short, long, env = "PLACES_RADIUS_METERS", default_value = "30000")]
        radius_meters: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Great-circle distance in miles between two points
    Distance {
        /// First point as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        from: String,

        /// Second point as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Nearby {
            query,
            limit,
            radius_meters,
            format,
        } => commands::nearby::run(cli.api_key, query, limit, radius_meters, format).await,
        Commands::Distance { from, to } => commands::distance::run(&from, &to),
    }
}
