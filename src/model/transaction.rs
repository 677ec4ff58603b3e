// src/model/transaction.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason fragments marking a manual correction rather than a physical move.
/// "set" also matches words like "reset" or "settlement"; kept as-is.
const CORRECTION_MARKERS: [&str; 2] = ["корректировка", "set"];

/// Reason fragments attributing an outgoing move to a sale.
const ORDER_MARKERS: [&str; 3] = ["заказ", "order", "sale"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    In,
    Out,
    Transfer,
    AttributeChange,
    Archive,
    Restore,
    // Legacy kinds still present in older history rows.
    StockIn,
    StockOut,
    Adjustment,
}

/// One immutable entry of an item's stock history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Signed change; only the magnitude feeds the analytics.
    pub change_amount: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cost_price: Option<f64>,
}

impl StockTransaction {
    pub fn magnitude(&self) -> u64 {
        self.change_amount.unsigned_abs()
    }

    pub fn bucket(&self) -> Bucket {
        classify(self.kind, self.reason.as_deref())
    }
}

/// Series a transaction contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Supply,
    Order,
    Wastage,
    Ignored,
}

impl Bucket {
    /// Orders and wastage both draw stock down.
    pub fn is_consumption(self) -> bool {
        matches!(self, Bucket::Order | Bucket::Wastage)
    }
}

/// Whether the record is an actual physical stock change.
///
/// Manual corrections, "set" operations and transfers between locations are not.
pub fn is_real_move(kind: TransactionType, reason: &str) -> bool {
    kind != TransactionType::Transfer && !CORRECTION_MARKERS.iter().any(|m| reason.contains(m))
}

/// Labels a transaction by its type and free-text reason. Matching is case-insensitive.
pub fn classify(kind: TransactionType, reason: Option<&str>) -> Bucket {
    let reason = reason.unwrap_or_default().to_lowercase();

    if !is_real_move(kind, &reason) {
        return Bucket::Ignored;
    }

    match kind {
        TransactionType::In => Bucket::Supply,
        TransactionType::Out => {
            if ORDER_MARKERS.iter().any(|m| reason.contains(m)) {
                Bucket::Order
            } else {
                // Any other outgoing real move is a write-off
                Bucket::Wastage
            }
        }
        _ => Bucket::Ignored,
    }
}
