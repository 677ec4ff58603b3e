//! Stock forecasting for inventory items.
//!
//! Turns an item's stock-change history into daily supply / order / wastage series,
//! extrapolates them with a decayed-trend model and walks the stock level forward
//! to estimate when it reaches the low, critical and zero marks.
//!
//! ```no_run
//! use chrono::Utc;
//! use stock_forecast::forecast;
//!
//! let result = forecast(&[], 120.0, 20.0, 5.0, &Utc::now()).unwrap();
//! println!("low stock in {} days", result.days_to_low);
//! ```

pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{ForecastError, Result};
pub use model::threshold::{DaysUntil, StockStatus};
pub use model::transaction::{classify, Bucket, StockTransaction, TransactionType};
pub use simulation::config::ForecastConfig;
pub use simulation::depletion::Thresholds;
pub use simulation::engine::{forecast, ForecastEngine, ForecastResult};
