// src/error.rs

use thiserror::Error;

/// Errors raised by the forecast engine and its CSV adapters.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("invalid forecast config: {0}")]
    InvalidConfig(String),

    #[error("invalid input (field={field}): {value} is not a finite number")]
    InvalidInput { field: &'static str, value: f64 },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;

/// Rejects NaN and infinities for a named scalar input.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ForecastError::InvalidInput { field, value })
    }
}
