// src/strategy/implementations.rs

use crate::simulation::config::ForecastConfig;
use crate::strategy::rates::mean;
use crate::strategy::traits::ForecastModel;

/// Decayed weighted-average forecast.
///
/// Each step pulls the previous value toward the historical mean and adds a damped
/// recent trend, both scaled by `decay^step`:
///
/// `next = mean + (prev - mean) * decay^i + trend * decay^i`, floored at zero,
/// where `trend = (mean(recent tail) - mean) * trend_damping`.
///
/// `prev` is the previous *forecast* value, so the decay compounds from step to step.
#[derive(Debug, Clone)]
pub struct DecayedTrendForecast {
    steps: usize,
    decay: f64,
    trend_damping: f64,
    recent_days: usize,
    min_points: usize,
}

impl DecayedTrendForecast {
    pub fn new(steps: usize, decay: f64, trend_damping: f64, recent_days: usize, min_points: usize) -> Self {
        Self {
            steps,
            decay,
            trend_damping,
            recent_days,
            min_points,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(
            config.forecast_days,
            config.decay,
            config.trend_damping,
            config.recent_days,
            config.min_points,
        )
    }
}

impl Default for DecayedTrendForecast {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl ForecastModel for DecayedTrendForecast {
    fn forecast(&self, history: &[f64]) -> Vec<f64> {
        if history.len() < self.min_points {
            return Vec::new();
        }
        let Some(&last) = history.last() else {
            return Vec::new();
        };

        let tail = &history[history.len().saturating_sub(self.recent_days)..];
        let avg_recent = mean(tail);
        let avg_overall = mean(history);
        let trend = (avg_recent - avg_overall) * self.trend_damping;

        let mut forecast = Vec::with_capacity(self.steps);
        let mut last_value = last;
        for step in 1..=self.steps {
            let decay = self.decay.powf(step as f64);
            let next = avg_overall + (last_value - avg_overall) * decay + trend * decay;
            // Stock movements cannot be negative
            let value = next.max(0.0);
            forecast.push(value);
            last_value = value;
        }
        forecast
    }
}
