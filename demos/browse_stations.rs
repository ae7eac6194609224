//! Fetches the station directory, lists the stations of one city and the
//! sensors of its first station.
//!
//! cargo run --example browse_stations -- Kraków

use gios_air::{AirQuality, AirQualityError};

#[tokio::main]
async fn main() -> Result<(), AirQualityError> {
    let city = std::env::args().nth(1).unwrap_or_else(|| "Kraków".to_string());
    let client = AirQuality::new().await?;

    let directory = client.stations().await?;
    println!(
        "Station directory: {} stations ({})",
        directory.len(),
        directory.freshness
    );

    let in_city = client.stations_in_city(&city).await;
    println!("{} stations in {}:", in_city.len(), city);
    for station in &in_city {
        println!("  {}", station);
    }

    if let Some(station) = in_city.first() {
        let sensors = client.sensors(station.id).await?;
        println!("Sensors at {} ({}):", station.name, sensors.freshness);
        for sensor in &sensors.records {
            println!("  {}", sensor);
        }
    }

    Ok(())
}
