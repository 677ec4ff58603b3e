// src/model/window.rs

use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::model::transaction::{Bucket, StockTransaction};

/// Per-bucket sums over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotals {
    pub supply: u64,
    pub orders: u64,
    pub wastage: u64,
}

impl BucketTotals {
    fn add(&mut self, bucket: Bucket, amount: u64) {
        match bucket {
            Bucket::Supply => self.supply = self.supply.saturating_add(amount),
            Bucket::Order => self.orders = self.orders.saturating_add(amount),
            Bucket::Wastage => self.wastage = self.wastage.saturating_add(amount),
            Bucket::Ignored => {}
        }
    }

    /// Orders plus wastage.
    pub fn consumption(&self) -> u64 {
        self.orders.saturating_add(self.wastage)
    }
}

/// Daily series for the current window plus totals for it and for the window before it.
///
/// Index 0 of each series is the oldest day, the last index is today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAggregate {
    pub supplies: Vec<f64>,
    pub orders: Vec<f64>,
    pub wastage: Vec<f64>,
    pub current: BucketTotals,
    pub previous: BucketTotals,
}

impl WindowAggregate {
    fn empty(window_days: usize) -> Self {
        Self {
            supplies: vec![0.0; window_days],
            orders: vec![0.0; window_days],
            wastage: vec![0.0; window_days],
            current: BucketTotals::default(),
            previous: BucketTotals::default(),
        }
    }

    fn series_mut(&mut self, bucket: Bucket) -> Option<&mut Vec<f64>> {
        match bucket {
            Bucket::Supply => Some(&mut self.supplies),
            Bucket::Order => Some(&mut self.orders),
            Bucket::Wastage => Some(&mut self.wastage),
            Bucket::Ignored => None,
        }
    }

    pub fn window_days(&self) -> usize {
        self.supplies.len()
    }
}

/// Whole calendar days from `then` to `now`, both seen in the time zone of `now`.
pub fn calendar_days_between<Tz: TimeZone>(now: &DateTime<Tz>, then: &DateTime<Utc>) -> i64 {
    let tz = now.timezone();
    now.date_naive()
        .signed_duration_since(then.with_timezone(&tz).date_naive())
        .num_days()
}

/// The instant `days` calendar days before `now` at the same wall-clock time in its zone.
///
/// Falls back to a fixed span of 24-hour days when that local time is skipped or
/// repeated by a clock change.
pub fn days_back<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> DateTime<Utc> {
    match now.clone().checked_sub_days(Days::new(days)) {
        Some(then) => then.with_timezone(&Utc),
        None => now.with_timezone(&Utc) - Duration::days(days as i64),
    }
}

/// Bins the history into daily buckets.
///
/// Records newer than `now - window_days` go to the current window, keyed by
/// calendar-day offset clamped into the series (future-dated records count as today).
/// Records in the `window_days` before that only feed the previous totals.
pub fn aggregate<Tz: TimeZone>(
    history: &[StockTransaction],
    now: &DateTime<Tz>,
    window_days: usize,
) -> WindowAggregate {
    let mut agg = WindowAggregate::empty(window_days);
    if window_days == 0 {
        return agg;
    }

    let current_start = days_back(now, window_days as u64);
    let previous_start = days_back(now, 2 * window_days as u64);
    let last_index = window_days as i64 - 1;

    let mut ignored = 0usize;
    for tx in history {
        let bucket = tx.bucket();
        if bucket == Bucket::Ignored {
            ignored += 1;
            continue;
        }
        let amount = tx.magnitude();

        if tx.created_at > current_start {
            let days_ago = calendar_days_between(now, &tx.created_at).clamp(0, last_index);
            let index = (last_index - days_ago) as usize;
            if let Some(series) = agg.series_mut(bucket) {
                series[index] += amount as f64;
            }
            agg.current.add(bucket, amount);
        } else if tx.created_at > previous_start {
            agg.previous.add(bucket, amount);
        }
    }

    debug!(
        records = history.len(),
        ignored,
        current_in = agg.current.supply,
        current_orders = agg.current.orders,
        current_wastage = agg.current.wastage,
        "history aggregated"
    );

    agg
}
