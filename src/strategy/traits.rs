// src/strategy/traits.rs

use std::fmt::Debug;

/// Projects a daily series past its last observed day.
///
/// Implementations are pure: the same input always yields the same output.
pub trait ForecastModel: Debug + Send + Sync {
    /// Returns the extrapolated values for the days after `history`.
    ///
    /// An empty vector means the history is too short to extrapolate.
    fn forecast(&self, history: &[f64]) -> Vec<f64>;
}
