// src/strategy/rates.rs

//! Scalar analytics derived from the aggregated window:
//! the blended daily consumption rate and period-over-period comparisons.

/// Arithmetic mean; an empty slice averages to zero.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len().max(1) as f64
}

/// Sum of the last `days` entries of a series.
pub fn tail_sum(values: &[f64], days: usize) -> f64 {
    values[values.len().saturating_sub(days)..].iter().sum()
}

/// Rounds half-way values toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Daily consumption rate blending the recent tail with the whole window.
///
/// `recent = (orders + wastage over the last recent_days) / recent_days`,
/// `overall = total_consumption / window_days`,
/// `rate = recent * recent_weight + overall * overall_weight`.
pub fn weighted_daily_consumption(
    orders: &[f64],
    wastage: &[f64],
    total_consumption: u64,
    window_days: usize,
    recent_days: usize,
    (recent_weight, overall_weight): (f64, f64),
) -> f64 {
    let recent = (tail_sum(orders, recent_days) + tail_sum(wastage, recent_days)) / recent_days.max(1) as f64;
    let overall = total_consumption as f64 / window_days.max(1) as f64;
    recent * recent_weight + overall * overall_weight
}

/// Percentage change from `previous` to `current`, rounded.
///
/// A zero base reports 100 when anything happened this period, else 0.
pub fn growth(current: u64, previous: u64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    round_half_up(change) as i64
}

/// Share of consumption written off as wastage, in whole percent.
pub fn wastage_rate(total_wastage: u64, total_consumption: u64) -> i64 {
    if total_consumption == 0 {
        return 0;
    }
    round_half_up(total_wastage as f64 / total_consumption as f64 * 100.0) as i64
}
