// src/io/synthetic.rs

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{ForecastError, Result};
use crate::model::transaction::{StockTransaction, TransactionType};

/// Shape of a generated stock history.
#[derive(Debug, Clone)]
pub struct SyntheticProfile {
    pub days: u32,
    pub mean_daily_orders: f64,
    pub std_dev_daily_orders: f64,
    /// A delivery arrives every `supply_every_days` days.
    pub supply_every_days: u32,
    pub supply_size: i64,
    /// Chance per day of a write-off.
    pub wastage_probability: f64,
    pub max_wastage: i64,
    /// Chance per day of a manual correction or a transfer (neither counts).
    pub noise_probability: f64,
}

impl Default for SyntheticProfile {
    fn default() -> Self {
        Self {
            days: 60,
            mean_daily_orders: 6.0,
            std_dev_daily_orders: 2.0,
            supply_every_days: 10,
            supply_size: 60,
            wastage_probability: 0.15,
            max_wastage: 4,
            noise_probability: 0.05,
        }
    }
}

const ORDER_REASONS: [&str; 3] = ["Заказ", "Order", "Online sale"];
const WASTAGE_REASONS: [&str; 3] = ["Брак", "Порча", "Списание"];

/// Generates a reproducible history ending at `now`, oldest first.
pub fn generate_history(profile: &SyntheticProfile, now: DateTime<Utc>, seed: u64) -> Result<Vec<StockTransaction>> {
    if !profile.std_dev_daily_orders.is_finite() || profile.std_dev_daily_orders < 0.0 {
        return Err(ForecastError::InvalidConfig(format!(
            "order std dev must be finite and non-negative, got {}",
            profile.std_dev_daily_orders
        )));
    }
    let normal = Normal::new(profile.mean_daily_orders, profile.std_dev_daily_orders)
        .map_err(|e| ForecastError::InvalidConfig(format!("order distribution: {e}")))?;
    if !(0.0..=1.0).contains(&profile.wastage_probability) || !(0.0..=1.0).contains(&profile.noise_probability) {
        return Err(ForecastError::InvalidConfig("probabilities must be within [0, 1]".into()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut history = Vec::new();
    let mut next_id = 0u64;
    let mut push = |history: &mut Vec<StockTransaction>,
                    kind: TransactionType,
                    amount: i64,
                    reason: &str,
                    at: DateTime<Utc>| {
        next_id += 1;
        history.push(StockTransaction {
            id: format!("syn-{next_id}"),
            kind,
            change_amount: amount,
            reason: Some(reason.to_string()),
            created_at: at,
            cost_price: None,
        });
    };

    for days_ago in (0..profile.days).rev() {
        let day = now - Duration::days(days_ago as i64) - Duration::hours(rng.gen_range(0..8));

        if profile.supply_every_days > 0 && days_ago % profile.supply_every_days == 0 {
            push(&mut history, TransactionType::In, profile.supply_size, "Поставка", day);
        }

        // Round and clamp: demand cannot be negative
        let orders = normal.sample(&mut rng).round().max(0.0) as i64;
        if orders > 0 {
            let reason = ORDER_REASONS[rng.gen_range(0..ORDER_REASONS.len())];
            push(&mut history, TransactionType::Out, -orders, reason, day);
        }

        if profile.max_wastage > 0 && rng.gen_bool(profile.wastage_probability) {
            let reason = WASTAGE_REASONS[rng.gen_range(0..WASTAGE_REASONS.len())];
            let amount = rng.gen_range(1..=profile.max_wastage);
            push(&mut history, TransactionType::Out, -amount, reason, day);
        }

        if rng.gen_bool(profile.noise_probability) {
            if rng.gen_bool(0.5) {
                push(&mut history, TransactionType::In, rng.gen_range(1..=5), "Корректировка", day);
            } else {
                push(&mut history, TransactionType::Transfer, -rng.gen_range(1..=10), "Склад B", day);
            }
        }
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transaction::Bucket;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_same_seed_same_history() {
        let profile = SyntheticProfile::default();
        let a = generate_history(&profile, now(), 7).unwrap();
        let b = generate_history(&profile, now(), 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_history_stays_in_range() {
        let history = generate_history(&SyntheticProfile::default(), now(), 1).unwrap();
        assert!(!history.is_empty());
        for tx in &history {
            assert!(tx.created_at <= now());
            assert!(tx.created_at > now() - Duration::days(61));
            if tx.bucket().is_consumption() {
                assert!(tx.change_amount < 0);
            }
        }
        assert!(history.iter().any(|tx| tx.bucket() == Bucket::Supply));
    }

    #[test]
    fn test_rejects_bad_distribution() {
        let profile = SyntheticProfile {
            std_dev_daily_orders: -1.0,
            ..SyntheticProfile::default()
        };
        assert!(matches!(
            generate_history(&profile, now(), 1),
            Err(ForecastError::InvalidConfig(_))
        ));

        let profile = SyntheticProfile {
            std_dev_daily_orders: f64::NAN,
            ..SyntheticProfile::default()
        };
        assert!(generate_history(&profile, now(), 1).is_err());

        let flat = SyntheticProfile {
            std_dev_daily_orders: 0.0,
            ..SyntheticProfile::default()
        };
        assert!(generate_history(&flat, now(), 1).is_ok());
    }
}
