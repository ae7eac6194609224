//! Summary statistics and a smoothed trend line for one sensor's series.
//!
//! The series is analyzed in the order it was received. Null readings are
//! skipped by the statistics and blank out every trend window they fall in.

use crate::analysis::error::AnalysisError;
use crate::types::measurement::Measurement;
use chrono::NaiveDateTime;
use log::debug;
use polars::df;
use polars::prelude::*;

/// One input row next to its smoothed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDateTime,
    pub value: Option<f64>,
    /// Centered rolling mean, `None` where the window is incomplete.
    pub trend: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    pub max_value: f64,
    pub max_date: NaiveDateTime,
    pub min_value: f64,
    pub min_date: NaiveDateTime,
    pub mean: f64,
    pub window_size: usize,
    pub trend: Vec<TrendPoint>,
}

impl TrendReport {
    /// The trend as a `date | value | trend` frame, ready for plotting.
    pub fn to_frame(&self) -> Result<DataFrame, AnalysisError> {
        let dates: Vec<NaiveDateTime> = self.trend.iter().map(|p| p.date).collect();
        let values: Vec<Option<f64>> = self.trend.iter().map(|p| p.value).collect();
        let trend: Vec<Option<f64>> = self.trend.iter().map(|p| p.trend).collect();
        Ok(df!(
            "date" => dates,
            "value" => values,
            "trend" => trend,
        )?)
    }
}

/// Rolling window length for a series of `len` rows: a tenth of the series,
/// at least one.
pub fn window_size(len: usize) -> usize {
    (len / 10).max(1)
}

pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Computes max/min (first occurrence wins), the mean and the centered
    /// rolling-mean trend of `series`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::EmptySeries`] for an empty slice and
    /// [`AnalysisError::NoValues`] when every reading is null.
    pub fn analyze(series: &[Measurement]) -> Result<TrendReport, AnalysisError> {
        if series.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }

        let window_size = window_size(series.len());
        let values: Vec<Option<f64>> = series.iter().map(|m| m.value).collect();

        let frame = df!("value" => &values)?
            .lazy()
            .with_column(
                col("value")
                    .rolling_mean(RollingOptionsFixedWindow {
                        window_size,
                        min_periods: window_size,
                        center: true,
                        ..Default::default()
                    })
                    .alias("trend"),
            )
            .collect()?;

        let value_col = frame.column("value")?.f64()?;
        let trend_col = frame.column("trend")?.f64()?;

        let (Some(max_value), Some(min_value), Some(mean)) =
            (value_col.max(), value_col.min(), value_col.mean())
        else {
            return Err(AnalysisError::NoValues(series.len()));
        };

        let first_index_of = |target: f64| {
            value_col
                .iter()
                .position(|v| v == Some(target))
                .unwrap_or(0)
        };
        let max_date = series[first_index_of(max_value)].date;
        let min_date = series[first_index_of(min_value)].date;

        let trend = series
            .iter()
            .enumerate()
            .map(|(i, m)| TrendPoint {
                date: m.date,
                value: m.value,
                trend: trend_col.get(i),
            })
            .collect();

        debug!(
            "Analyzed {} rows: max {} at {}, min {} at {}, mean {:.3}, window {}",
            series.len(),
            max_value,
            max_date,
            min_value,
            min_date,
            mean,
            window_size
        );

        Ok(TrendReport {
            max_value,
            max_date,
            min_value,
            min_date,
            mean,
            window_size,
            trend,
        })
    }
}
