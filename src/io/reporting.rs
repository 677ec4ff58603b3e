// src/io/reporting.rs

use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::simulation::engine::ForecastResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    History,
    Forecast,
}

/// One chart point. Offsets are relative to today (negative = past).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub offset: i64,
    pub date: NaiveDate,
    pub kind: RowKind,
    pub supplies: f64,
    pub orders: f64,
    pub wastage: f64,
}

fn value_at(series: &[f64], i: usize) -> f64 {
    series.get(i).copied().unwrap_or(0.0)
}

/// Flattens the daily history and the forecast into chart rows, oldest first.
pub fn series_rows(result: &ForecastResult) -> Vec<SeriesRow> {
    let window = result.supplies.len() as i64;
    let today = result.window_start + Duration::days(window - 1);

    let history = result.series_dates().enumerate().map(|(i, date)| SeriesRow {
        offset: i as i64 - (window - 1),
        date,
        kind: RowKind::History,
        supplies: result.supplies[i],
        orders: result.orders[i],
        wastage: result.wastage[i],
    });

    let forecast_len = result
        .order_forecast
        .len()
        .max(result.supply_forecast.len())
        .max(result.wastage_forecast.len());
    let forecast = (0..forecast_len).map(|i| SeriesRow {
        offset: i as i64 + 1,
        date: today + Duration::days(i as i64 + 1),
        kind: RowKind::Forecast,
        supplies: value_at(&result.supply_forecast, i),
        orders: value_at(&result.order_forecast, i),
        wastage: value_at(&result.wastage_forecast, i),
    });

    history.chain(forecast).collect()
}

/// Writes the chart rows as CSV to any writer.
pub fn write_series<W: Write>(writer: W, result: &ForecastResult) -> Result<usize> {
    let rows = series_rows(result);
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Writes the chart rows to a CSV file.
pub fn write_series_file<P: AsRef<Path>>(path: P, result: &ForecastResult) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    let rows = write_series(file, result)?;
    info!(rows, path = %path.display(), "forecast series exported");
    Ok(())
}
