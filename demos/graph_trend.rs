//! Fetches one sensor's series and plots it next to its trend line.
//!
//! To run this example:
//! cargo run --example graph_trend --features examples -- 92

use gios_air::{parse_id, AirQuality};
use plotlars::{Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let input = std::env::args().nth(1).unwrap_or_else(|| "92".to_string());
    let sensor_id = parse_id(&input)?;

    let client = AirQuality::new().await?;
    client.measurements(sensor_id).await?;
    let report = client.analyze().await?;

    println!("Generating trend plot...");
    plot_trend(&report.to_frame()?);
    println!("Plot shown in browser.");

    Ok(())
}

fn plot_trend(data: &DataFrame) {
    TimeSeriesPlot::builder()
        .data(data)
        .x("date")
        .y("value")
        .additional_series(vec!["trend"])
        .colors(vec![Rgb(69, 157, 230), Rgb(235, 117, 0)])
        .lines(vec![Line::Solid, Line::Dash])
        .plot_title(Text::from("Measurements and trend").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("date")
        .y_title("value")
        .build()
        .plot();
}
