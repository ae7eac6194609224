//! Prints the measurement series of one sensor and its summary statistics.
//!
//! cargo run --example sensor_series -- 92

use gios_air::{parse_id, AirQuality};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let input = std::env::args().nth(1).unwrap_or_else(|| "92".to_string());
    let sensor_id = parse_id(&input)?;

    let client = AirQuality::new().await?;
    let series = client.measurements(sensor_id).await?;
    println!(
        "Sensor {}: {} measurements ({})",
        sensor_id,
        series.len(),
        series.freshness
    );
    for measurement in series.records.iter().take(10) {
        println!("  {}", measurement);
    }

    let report = client.analyze().await?;
    println!("Max:  {} at {}", report.max_value, report.max_date);
    println!("Min:  {} at {}", report.min_value, report.min_date);
    println!("Mean: {:.2}", report.mean);
    println!("Trend window: {} rows", report.window_size);

    Ok(())
}
