use anyhow::{bail, Context, Result};
use medicheck::config::{LIMIT_RANGE, RADIUS_RANGE};
use medicheck::geojson::to_feature_collection;
use medicheck::{ConfigBuilder, Hospital, HospitalFinder, MedicheckError, NearbyResults, Origin};
use serde::Serialize;

use crate::OutputFormat;

#[derive(Serialize)]
struct NearbyOutput<'a> {
    origin: &'a Origin,
    count: usize,
    results: &'a [Hospital],
}

pub async fn run(
    api_key: Option<String>,
    query: String,
    limit: usize,
    radius_meters: u32,
    format: OutputFormat,
) -> Result<()> {
    if !LIMIT_RANGE.contains(&limit) {
        bail!(
            "--limit must be between {} and {}",
            LIMIT_RANGE.start(),
            LIMIT_RANGE.end()
        );
    }
    if !RADIUS_RANGE.contains(&radius_meters) {
        bail!(
            "--radius-meters must be between {} and {}",
            RADIUS_RANGE.start(),
            RADIUS_RANGE.end()
        );
    }

    // Environment first so GOOGLE_MAPS_API_KEY still works as a fallback
    let mut builder = ConfigBuilder::from_env()
        .max_results(limit)
        .default_radius_meters(radius_meters);
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build().context("Invalid configuration")?;

    let finder = HospitalFinder::new(&config).context("Failed to create HTTP clients")?;

    let results = match finder.find_nearby(&query, limit, radius_meters).await {
        Ok(results) => results,
        Err(MedicheckError::LocationNotFound { query }) => {
            bail!("Location not found: {}", query)
        }
        Err(MedicheckError::MissingApiKey) => {
            bail!("No API key. Use --api-key or set GOOGLE_PLACES_API_KEY")
        }
        Err(e) => return Err(e).context("Nearby search failed"),
    };

    match format {
        OutputFormat::Text => print_table(&results),
        OutputFormat::Json => {
            let output = NearbyOutput {
                origin: &results.origin,
                count: results.hospitals.len(),
                results: &results.hospitals,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Geojson => {
            let collection = to_feature_collection(&results);
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
    }

    Ok(())
}

fn print_table(results: &NearbyResults) {
    let origin = &results.origin;
    println!(
        "Origin: {} ({:.4}, {:.4})",
        origin.formatted_address.as_deref().unwrap_or("-"),
        origin.latitude,
        origin.longitude
    );

    if results.hospitals.is_empty() {
        println!("No hospitals found");
        return;
    }

    println!();
    println!("{:>3} {:>8}  {:<40} {}", "#", "MILES", "NAME", "ADDRESS");
    println!("{}", "-".repeat(80));

    for (i, hospital) in results.hospitals.iter().enumerate() {
        println!(
            "{:>3} {:>8.2}  {:<40} {}",
            i + 1,
            hospital.distance_miles,
            truncate(&hospital.name, 40),
            hospital.formatted_address.as_deref().unwrap_or("-")
        );
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with "...".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
