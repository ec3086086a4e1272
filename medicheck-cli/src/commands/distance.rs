use anyhow::{bail, Context, Result};
use medicheck::Coordinate;

pub fn run(from: &str, to: &str) -> Result<()> {
    let a = parse_coordinate(from).with_context(|| format!("Invalid --from value: {}", from))?;
    let b = parse_coordinate(to).with_context(|| format!("Invalid --to value: {}", to))?;

    println!("{:.3}", a.distance_miles(&b));

    Ok(())
}

/// Parse `LAT,LNG` in decimal degrees.
fn parse_coordinate(value: &str) -> Result<Coordinate> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        bail!("expected LAT,LNG");
    }

    let lat: f64 = parts[0].parse().context("latitude is not a number")?;
    let lng: f64 = parts[1].parse().context("longitude is not a number")?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        bail!("coordinate out of range (lat ±90, lng ±180)");
    }

    Ok(Coordinate::new(lat, lng))
}
