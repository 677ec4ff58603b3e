// src/simulation/config.rs

use crate::error::{ForecastError, Result};

/// Tunable constants of the forecast engine. `Default` is the production setting.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Length of the daily history window (and of the comparison window before it).
    pub window_days: usize,
    /// Days covered by the per-series detailed forecast.
    pub forecast_days: usize,
    /// Total simulated days including the detailed forecast.
    pub horizon_days: usize,
    /// Per-step decay toward the historical mean.
    pub decay: f64,
    /// Share of the recent-vs-overall gap kept as trend.
    pub trend_damping: f64,
    /// Length of the "recent" tail used for the trend and the blended rate.
    pub recent_days: usize,
    /// Weight of recent consumption in the blended daily rate.
    pub recent_weight: f64,
    /// Weight of the whole-window average in the blended daily rate.
    pub overall_weight: f64,
    /// Shortest series the forecaster will extrapolate.
    pub min_points: usize,
    /// Lower bound of the chart scale.
    pub chart_floor: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            forecast_days: 12,
            horizon_days: 180,
            decay: 0.85,
            trend_damping: 0.5,
            recent_days: 7,
            recent_weight: 0.7,
            overall_weight: 0.3,
            min_points: 5,
            chart_floor: 5.0,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(ForecastError::InvalidConfig("window_days must be at least 1".into()));
        }
        if self.recent_days == 0 || self.recent_days > self.window_days {
            return Err(ForecastError::InvalidConfig(format!(
                "recent_days must be within 1..={}",
                self.window_days
            )));
        }
        if self.horizon_days < self.forecast_days {
            return Err(ForecastError::InvalidConfig(format!(
                "horizon_days ({}) is shorter than forecast_days ({})",
                self.horizon_days, self.forecast_days
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(ForecastError::InvalidConfig(format!("decay {} outside (0, 1]", self.decay)));
        }
        for (name, weight) in [
            ("trend_damping", self.trend_damping),
            ("recent_weight", self.recent_weight),
            ("overall_weight", self.overall_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ForecastError::InvalidConfig(format!("{name} {weight} outside [0, 1]")));
            }
        }
        if !self.chart_floor.is_finite() {
            return Err(ForecastError::InvalidConfig("chart_floor must be finite".into()));
        }
        Ok(())
    }

    /// Days simulated with the linear fallback rate after the detailed forecast.
    pub fn fallback_days(&self) -> usize {
        self.horizon_days - self.forecast_days
    }
}
