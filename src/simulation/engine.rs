// src/simulation/engine.rs

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::Serialize;
use tracing::debug;

use crate::error::{ensure_finite, Result};
use crate::model::threshold::{DaysUntil, StockStatus};
use crate::model::transaction::StockTransaction;
use crate::model::window::aggregate;
use crate::simulation::config::ForecastConfig;
use crate::simulation::depletion::{DepletionSimulator, SeriesForecasts, Thresholds};
use crate::strategy::implementations::DecayedTrendForecast;
use crate::strategy::rates::{growth, wastage_rate, weighted_daily_consumption};
use crate::strategy::traits::ForecastModel;

/// Low-stock milestones this close (in days) are flagged as urgent.
pub const LOW_STOCK_URGENT_DAYS: u32 = 7;
/// Critical milestones this close (in days) are flagged as urgent.
pub const CRITICAL_STOCK_URGENT_DAYS: u32 = 3;

/// Everything the item analytics view renders for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Calendar date of index 0 of the daily series.
    pub window_start: NaiveDate,

    pub supplies: Vec<f64>,
    pub orders: Vec<f64>,
    pub wastage: Vec<f64>,

    pub supply_forecast: Vec<f64>,
    pub order_forecast: Vec<f64>,
    pub wastage_forecast: Vec<f64>,

    pub total_in: u64,
    pub total_out: u64,
    pub total_wastage: u64,
    pub prev_total_in: u64,
    pub prev_total_out: u64,
    pub prev_total_wastage: u64,

    pub in_growth: i64,
    pub orders_growth: i64,
    pub wastage_growth: i64,
    pub wastage_rate: i64,

    pub weighted_avg_daily_out: f64,

    pub days_to_low: DaysUntil,
    pub days_to_critical: DaysUntil,
    pub days_to_zero: DaysUntil,
    pub stock_projection: Vec<f64>,

    pub status: StockStatus,
    /// Chart scale: largest daily value, never below the configured floor.
    pub max_val: f64,
}

impl ForecastResult {
    /// Daily rate with one decimal, as shown next to the totals.
    pub fn avg_daily_out_display(&self) -> String {
        format!("{:.1}", self.weighted_avg_daily_out)
    }

    /// Calendar date of each index of the daily series.
    pub fn series_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.supplies.len()).map(move |i| self.window_start + Duration::days(i as i64))
    }

    pub fn total_consumption(&self) -> u64 {
        self.total_out.saturating_add(self.total_wastage)
    }

    pub fn low_stock_urgent(&self) -> bool {
        self.days_to_low.within(LOW_STOCK_URGENT_DAYS)
    }

    pub fn critical_stock_urgent(&self) -> bool {
        self.days_to_critical.within(CRITICAL_STOCK_URGENT_DAYS)
    }
}

/// Stock forecast engine: history in, analytics bundle out.
///
/// Stateless between calls; identical inputs give identical results.
#[derive(Debug)]
pub struct ForecastEngine {
    config: ForecastConfig,
    model: Box<dyn ForecastModel>,
    simulator: DepletionSimulator,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        let model = Box::new(DecayedTrendForecast::from_config(&config));
        Self::with_model(config, model)
    }

    /// Swaps in a different per-series forecast model.
    pub fn with_model(config: ForecastConfig, model: Box<dyn ForecastModel>) -> Result<Self> {
        config.validate()?;
        let simulator = DepletionSimulator::from_config(&config);
        Ok(Self {
            config,
            model,
            simulator,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn analyze<Tz: TimeZone>(
        &self,
        history: &[StockTransaction],
        current_quantity: f64,
        thresholds: Thresholds,
        now: &DateTime<Tz>,
    ) -> Result<ForecastResult> {
        let current_quantity = ensure_finite("current_quantity", current_quantity)?;
        let thresholds = Thresholds::new(
            ensure_finite("low_stock_threshold", thresholds.low)?,
            ensure_finite("critical_stock_threshold", thresholds.critical)?,
        );
        let config = &self.config;

        let agg = aggregate(history, now, config.window_days);
        let current = agg.current;
        let previous = agg.previous;

        let weighted_avg_daily_out = weighted_daily_consumption(
            &agg.orders,
            &agg.wastage,
            current.consumption(),
            config.window_days,
            config.recent_days,
            (config.recent_weight, config.overall_weight),
        );

        let order_forecast = self.model.forecast(&agg.orders);
        let supply_forecast = self.model.forecast(&agg.supplies);
        let wastage_forecast = self.model.forecast(&agg.wastage);

        let outcome = self.simulator.simulate(
            current_quantity,
            thresholds,
            SeriesForecasts {
                supplies: &supply_forecast,
                orders: &order_forecast,
                wastage: &wastage_forecast,
            },
            weighted_avg_daily_out,
        );

        let max_val = agg
            .supplies
            .iter()
            .chain(&agg.orders)
            .chain(&agg.wastage)
            .copied()
            .fold(config.chart_floor, f64::max);

        let window_start = now.date_naive() - Duration::days(config.window_days as i64 - 1);

        debug!(
            rate = weighted_avg_daily_out,
            days_to_low = %outcome.days_to_low,
            days_to_critical = %outcome.days_to_critical,
            days_to_zero = %outcome.days_to_zero,
            "forecast computed"
        );

        Ok(ForecastResult {
            window_start,
            supplies: agg.supplies,
            orders: agg.orders,
            wastage: agg.wastage,
            supply_forecast,
            order_forecast,
            wastage_forecast,
            total_in: current.supply,
            total_out: current.orders,
            total_wastage: current.wastage,
            prev_total_in: previous.supply,
            prev_total_out: previous.orders,
            prev_total_wastage: previous.wastage,
            in_growth: growth(current.supply, previous.supply),
            orders_growth: growth(current.orders, previous.orders),
            wastage_growth: growth(current.wastage, previous.wastage),
            wastage_rate: wastage_rate(current.wastage, current.consumption()),
            weighted_avg_daily_out,
            days_to_low: outcome.days_to_low,
            days_to_critical: outcome.days_to_critical,
            days_to_zero: outcome.days_to_zero,
            stock_projection: outcome.stock_projection,
            status: StockStatus::of(current_quantity, thresholds.low, thresholds.critical),
            max_val,
        })
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        let config = ForecastConfig::default();
        Self {
            model: Box::new(DecayedTrendForecast::from_config(&config)),
            simulator: DepletionSimulator::from_config(&config),
            config,
        }
    }
}

/// Runs the default engine once.
pub fn forecast<Tz: TimeZone>(
    history: &[StockTransaction],
    current_quantity: f64,
    low_stock_threshold: f64,
    critical_stock_threshold: f64,
    now: &DateTime<Tz>,
) -> Result<ForecastResult> {
    ForecastEngine::default().analyze(
        history,
        current_quantity,
        Thresholds::new(low_stock_threshold, critical_stock_threshold),
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use crate::model::transaction::TransactionType;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    fn daily_orders(amount: i64, days: i64) -> Vec<StockTransaction> {
        (0..days)
            .map(|d| StockTransaction {
                id: format!("o{d}"),
                kind: TransactionType::Out,
                change_amount: -amount,
                reason: Some("Заказ".to_string()),
                created_at: now() - Duration::days(d),
                cost_price: None,
            })
            .collect()
    }

    #[test]
    fn test_empty_history() {
        let result = forecast(&[], 50.0, 10.0, 0.0, &now()).unwrap();
        assert_eq!(result.total_in + result.total_out + result.total_wastage, 0);
        assert_eq!(result.weighted_avg_daily_out, 0.0);
        assert_eq!(result.days_to_low, DaysUntil::Never);
        assert_eq!(result.days_to_zero, DaysUntil::Never);
        assert_eq!(result.max_val, 5.0);
        assert_eq!(result.in_growth, 0);
        assert_eq!(result.status, StockStatus::Normal);
        assert_eq!(result.avg_daily_out_display(), "0.0");
    }

    #[test]
    fn test_steady_consumption_runs_out() {
        let history = daily_orders(2, 30);
        let result = forecast(&history, 40.0, 10.0, 4.0, &now()).unwrap();

        assert_eq!(result.total_out, 60);
        assert!((result.weighted_avg_daily_out - 2.0).abs() < 1e-12);
        assert_eq!(result.order_forecast.len(), 12);
        // 40 - 2n crosses 10 at n = 15, 4 at n = 18, 0 at n = 20
        assert_eq!(result.days_to_low, DaysUntil::In(15));
        assert_eq!(result.days_to_critical, DaysUntil::In(18));
        assert_eq!(result.days_to_zero, DaysUntil::In(20));
        assert!(!result.low_stock_urgent());
    }

    #[test]
    fn test_window_start_and_dates() {
        let result = forecast(&[], 1.0, 0.0, 0.0, &now()).unwrap();
        assert_eq!(result.window_start, NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        let dates: Vec<_> = result.series_dates().collect();
        assert_eq!(dates.len(), 30);
        assert_eq!(dates[29], now().date_naive());
    }

    #[test]
    fn test_rejects_nan_quantity() {
        let err = forecast(&[], f64::NAN, 10.0, 0.0, &now()).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput { field: "current_quantity", .. }));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ForecastConfig {
            window_days: 0,
            ..ForecastConfig::default()
        };
        assert!(ForecastEngine::new(config).is_err());
    }

    #[test]
    fn test_custom_model_is_used() {
        #[derive(Debug)]
        struct Drain;
        impl ForecastModel for Drain {
            fn forecast(&self, _history: &[f64]) -> Vec<f64> {
                vec![1.0; 12]
            }
        }

        let engine = ForecastEngine::with_model(ForecastConfig::default(), Box::new(Drain)).unwrap();
        let result = engine.analyze(&[], 3.0, Thresholds::low_only(1.0), &now()).unwrap();
        // Supply and orders cancel out, wastage drains one unit a day
        assert_eq!(result.days_to_low, DaysUntil::In(2));
        assert_eq!(result.days_to_zero, DaysUntil::In(3));
        assert!(result.critical_stock_urgent());
    }
}
