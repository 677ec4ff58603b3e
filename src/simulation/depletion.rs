// src/simulation/depletion.rs

use serde::Serialize;

use crate::model::threshold::DaysUntil;
use crate::simulation::config::ForecastConfig;

/// Stock levels an item is tracked against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub low: f64,
    pub critical: f64,
}

impl Thresholds {
    pub fn new(low: f64, critical: f64) -> Self {
        Self { low, critical }
    }

    /// Low threshold only; critical defaults to zero.
    pub fn low_only(low: f64) -> Self {
        Self { low, critical: 0.0 }
    }
}

/// Per-series forecasts fed to the simulator.
#[derive(Debug, Clone, Copy)]
pub struct SeriesForecasts<'a> {
    pub supplies: &'a [f64],
    pub orders: &'a [f64],
    pub wastage: &'a [f64],
}

/// When each threshold is first crossed, plus the simulated stock trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepletionOutcome {
    pub days_to_low: DaysUntil,
    pub days_to_critical: DaysUntil,
    pub days_to_zero: DaysUntil,
    /// Simulated stock after each day of the detailed forecast.
    pub stock_projection: Vec<f64>,
}

/// First-crossing bookkeeping; each milestone is recorded once.
#[derive(Debug)]
struct Milestones {
    thresholds: Thresholds,
    low: DaysUntil,
    critical: DaysUntil,
    zero: DaysUntil,
}

impl Milestones {
    fn new(current_quantity: f64, thresholds: Thresholds) -> Self {
        let at_or_below = |level: f64| {
            if current_quantity <= level {
                DaysUntil::NOW
            } else {
                DaysUntil::Never
            }
        };
        Self {
            thresholds,
            low: at_or_below(thresholds.low),
            critical: at_or_below(thresholds.critical),
            // Zero is only ever recorded by the walk itself
            zero: DaysUntil::Never,
        }
    }

    fn observe(&mut self, stock: f64, day: u32) {
        for (slot, level) in [
            (&mut self.low, self.thresholds.low),
            (&mut self.critical, self.thresholds.critical),
            (&mut self.zero, 0.0),
        ] {
            if slot.is_never() && stock <= level {
                *slot = DaysUntil::In(day);
            }
        }
    }
}

/// Walks the stock level forward day by day.
///
/// The first `forecast_days` use the per-series forecasts; after that a single
/// linear consumption rate continues until `horizon_days` or until stock runs out.
#[derive(Debug, Clone)]
pub struct DepletionSimulator {
    forecast_days: usize,
    fallback_days: usize,
}

impl DepletionSimulator {
    pub fn new(forecast_days: usize, horizon_days: usize) -> Self {
        Self {
            forecast_days,
            fallback_days: horizon_days.saturating_sub(forecast_days),
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.forecast_days, config.horizon_days)
    }

    pub fn simulate(
        &self,
        current_quantity: f64,
        thresholds: Thresholds,
        forecasts: SeriesForecasts<'_>,
        daily_rate: f64,
    ) -> DepletionOutcome {
        let mut milestones = Milestones::new(current_quantity, thresholds);
        let mut stock = current_quantity;

        let detailed_days = forecasts.orders.len();
        let mut stock_projection = Vec::with_capacity(detailed_days);
        for day in 0..detailed_days {
            let supply = forecasts.supplies.get(day).copied().unwrap_or(0.0);
            let orders = forecasts.orders[day];
            let wastage = forecasts.wastage.get(day).copied().unwrap_or(0.0);

            stock += supply - orders - wastage;
            stock_projection.push(stock);
            milestones.observe(stock, day as u32 + 1);
        }

        // Fallback offsets continue from the nominal forecast length
        if daily_rate > 0.0 {
            for day in 1..=self.fallback_days {
                stock -= daily_rate;
                milestones.observe(stock, (day + self.forecast_days) as u32);
                if stock <= 0.0 {
                    break;
                }
            }
        }

        DepletionOutcome {
            days_to_low: milestones.low,
            days_to_critical: milestones.critical,
            days_to_zero: milestones.zero,
            stock_projection,
        }
    }
}

impl Default for DepletionSimulator {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [f64; 0] = [];

    fn flat(value: f64) -> Vec<f64> {
        vec![value; 12]
    }

    fn forecasts<'a>(supplies: &'a [f64], orders: &'a [f64], wastage: &'a [f64]) -> SeriesForecasts<'a> {
        SeriesForecasts {
            supplies,
            orders,
            wastage,
        }
    }

    #[test]
    fn test_nothing_moves_nothing_crossed() {
        let zero = flat(0.0);
        let outcome = DepletionSimulator::default().simulate(
            100.0,
            Thresholds::low_only(10.0),
            forecasts(&zero, &zero, &zero),
            0.0,
        );
        assert_eq!(outcome.days_to_low, DaysUntil::Never);
        assert_eq!(outcome.days_to_critical, DaysUntil::Never);
        assert_eq!(outcome.days_to_zero, DaysUntil::Never);
        assert_eq!(outcome.stock_projection, flat(100.0));
    }

    #[test]
    fn test_already_below_thresholds() {
        let outcome = DepletionSimulator::default().simulate(
            0.0,
            Thresholds::new(10.0, 0.0),
            forecasts(&NONE, &NONE, &NONE),
            0.0,
        );
        assert_eq!(outcome.days_to_low, DaysUntil::NOW);
        assert_eq!(outcome.days_to_critical, DaysUntil::NOW);
        // Zero is never pre-set, and nothing was simulated
        assert_eq!(outcome.days_to_zero, DaysUntil::Never);
    }

    #[test]
    fn test_crossings_inside_detailed_forecast() {
        let zero = flat(0.0);
        let orders = flat(10.0);
        let outcome = DepletionSimulator::default().simulate(
            50.0,
            Thresholds::new(20.0, 5.0),
            forecasts(&zero, &orders, &zero),
            10.0,
        );
        // 40, 30, 20 -> low on day 3; 10, 0 -> critical and zero on day 5
        assert_eq!(outcome.days_to_low, DaysUntil::In(3));
        assert_eq!(outcome.days_to_critical, DaysUntil::In(5));
        assert_eq!(outcome.days_to_zero, DaysUntil::In(5));
        assert_eq!(outcome.stock_projection[2], 20.0);
    }

    #[test]
    fn test_wastage_and_supply_both_count() {
        let supplies = flat(5.0);
        let orders = flat(5.0);
        let wastage = flat(1.0);
        let outcome = DepletionSimulator::default().simulate(
            3.0,
            Thresholds::new(2.0, 1.0),
            forecasts(&supplies, &orders, &wastage),
            0.0,
        );
        assert_eq!(outcome.days_to_low, DaysUntil::In(1));
        assert_eq!(outcome.days_to_critical, DaysUntil::In(2));
        assert_eq!(outcome.days_to_zero, DaysUntil::In(3));
    }

    #[test]
    fn test_linear_fallback_offsets_start_after_forecast() {
        let zero = flat(0.0);
        let outcome = DepletionSimulator::default().simulate(
            100.0,
            Thresholds::new(10.0, 0.0),
            forecasts(&zero, &zero, &zero),
            2.0,
        );
        // 100 - 2n <= 10 at n = 45 -> day 57; zero at n = 50 -> day 62
        assert_eq!(outcome.days_to_low, DaysUntil::In(57));
        assert_eq!(outcome.days_to_critical, DaysUntil::In(62));
        assert_eq!(outcome.days_to_zero, DaysUntil::In(62));
    }

    #[test]
    fn test_horizon_caps_at_180_days() {
        let zero = flat(0.0);
        let outcome = DepletionSimulator::default().simulate(
            1000.0,
            Thresholds::new(850.0, 0.0),
            forecasts(&zero, &zero, &zero),
            1.0,
        );
        // 1000 - 150 at fallback day 150 -> offset 162; zero is beyond the horizon
        assert_eq!(outcome.days_to_low, DaysUntil::In(162));
        assert_eq!(outcome.days_to_zero, DaysUntil::Never);
    }

    #[test]
    fn test_fallback_stops_once_empty() {
        let zero = flat(0.0);
        let outcome = DepletionSimulator::default().simulate(
            5.0,
            Thresholds::new(1.0, -10.0),
            forecasts(&zero, &zero, &zero),
            5.0,
        );
        assert_eq!(outcome.days_to_zero, DaysUntil::In(13));
        // The walk halts at zero so a negative critical level is never reached
        assert_eq!(outcome.days_to_critical, DaysUntil::Never);
    }
}
