//! Lists the stations within a radius of an address.
//!
//! cargo run --example stations_near -- "Rynek Główny, Kraków" 15

use gios_air::AirQuality;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let address = args.next().unwrap_or_else(|| "Warszawa".to_string());
    let radius: f64 = match args.next() {
        Some(r) => r.parse()?,
        None => 25.0,
    };

    let client = AirQuality::configured()
        .user_agent("gios-air-demo/0.1 (stations_near example)")
        .call()
        .await?;

    // Geocoding and the directory download run in the background.
    let request = client.spawn_find_stations(address.clone(), radius);
    println!("Searching for stations within {} km of {}...", radius, address);
    let found = request.wait().await?;

    if found.is_empty() {
        println!("No stations found.");
    }
    for (station, distance_km) in found {
        println!("{:>7.2} km  {}", distance_km, station);
    }

    Ok(())
}
