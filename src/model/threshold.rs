// src/model/threshold.rs

use std::fmt;

use serde::Serialize;

/// Day offset at which a stock threshold is first reached.
///
/// `In(0)` means the threshold is already reached today. `Never` sorts after every
/// finite offset, so milestones can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysUntil {
    In(u32),
    Never,
}

impl DaysUntil {
    pub const NOW: DaysUntil = DaysUntil::In(0);

    pub fn days(self) -> Option<u32> {
        match self {
            DaysUntil::In(d) => Some(d),
            DaysUntil::Never => None,
        }
    }

    pub fn is_reached(self) -> bool {
        self == Self::NOW
    }

    pub fn is_never(self) -> bool {
        self == DaysUntil::Never
    }

    /// True when the offset is finite and at most `days`.
    pub fn within(self, days: u32) -> bool {
        matches!(self, DaysUntil::In(d) if d <= days)
    }
}

impl fmt::Display for DaysUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysUntil::In(d) => write!(f, "{d}"),
            DaysUntil::Never => f.write_str("∞"),
        }
    }
}

/// Where the on-hand quantity sits relative to the item's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Low,
    Normal,
}

impl StockStatus {
    pub fn of(current_quantity: f64, low_threshold: f64, critical_threshold: f64) -> Self {
        if current_quantity <= critical_threshold {
            StockStatus::Critical
        } else if current_quantity <= low_threshold {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}
