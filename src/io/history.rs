// src/io/history.rs

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::model::transaction::{StockTransaction, TransactionType};

/// Raw CSV row; every field is checked before it becomes a transaction.
#[derive(Debug, Deserialize)]
struct HistoryRow {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    change_amount: String,
    #[serde(default)]
    reason: Option<String>,
    created_at: String,
    #[serde(default)]
    cost_price: Option<String>,
}

/// Transactions read from a history export, plus how many rows were dropped.
#[derive(Debug, Default)]
pub struct HistoryImport {
    pub transactions: Vec<StockTransaction>,
    pub skipped: usize,
}

/// Parses a timestamp in any of the formats seen in history exports.
///
/// Naive values are taken as UTC; a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_kind(raw: &str) -> Option<TransactionType> {
    let kind = match raw.trim().to_lowercase().as_str() {
        "in" => TransactionType::In,
        "out" => TransactionType::Out,
        "transfer" => TransactionType::Transfer,
        "attribute_change" => TransactionType::AttributeChange,
        "archive" => TransactionType::Archive,
        "restore" => TransactionType::Restore,
        "stock_in" => TransactionType::StockIn,
        "stock_out" => TransactionType::StockOut,
        "adjustment" => TransactionType::Adjustment,
        _ => return None,
    };
    Some(kind)
}

impl HistoryRow {
    fn into_transaction(self) -> std::result::Result<StockTransaction, String> {
        let kind = parse_kind(&self.kind).ok_or_else(|| format!("unknown type '{}'", self.kind))?;
        let change_amount = self
            .change_amount
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("bad change_amount '{}'", self.change_amount))?;
        let created_at =
            parse_timestamp(&self.created_at).ok_or_else(|| format!("bad created_at '{}'", self.created_at))?;
        // cost_price is informational; an unreadable one is dropped, not fatal
        let cost_price = self
            .cost_price
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok());

        Ok(StockTransaction {
            id: self.id,
            kind,
            change_amount,
            reason: self.reason.filter(|r| !r.is_empty()),
            created_at,
            cost_price,
        })
    }
}

/// Reads history rows (`id,type,change_amount,reason,created_at,cost_price`).
///
/// Malformed rows are skipped and counted; only I/O and framing errors fail the import.
pub fn read_history<R: Read>(reader: R) -> Result<HistoryImport> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).flexible(true).from_reader(reader);
    let mut import = HistoryImport::default();

    for (line, row) in rdr.deserialize::<HistoryRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(line = line + 2, error = %err, "skipping unreadable history row");
                import.skipped += 1;
                continue;
            }
        };
        match row.into_transaction() {
            Ok(tx) => import.transactions.push(tx),
            Err(reason) => {
                warn!(line = line + 2, %reason, "skipping malformed history row");
                import.skipped += 1;
            }
        }
    }

    Ok(import)
}

pub fn read_history_file<P: AsRef<Path>>(path: P) -> Result<HistoryImport> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let import = read_history(file)?;
    info!(
        path = %path.display(),
        loaded = import.transactions.len(),
        skipped = import.skipped,
        "history imported"
    );
    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = "\
id,type,change_amount,reason,created_at,cost_price
1,in,100,Поставка,2024-06-10T08:00:00Z,12.5
2,out,-3,Заказ #17,2024-06-11 10:15:00,
3,out,-1,,2024-06-12,
4,teleport,5,,2024-06-12,
5,out,abc,order,2024-06-12,
6,out,-2,order,yesterday,
";

    #[test]
    fn test_reads_valid_rows_and_skips_broken_ones() {
        let import = read_history(SAMPLE.as_bytes()).unwrap();
        assert_eq!(import.transactions.len(), 3);
        assert_eq!(import.skipped, 3);

        let first = &import.transactions[0];
        assert_eq!(first.kind, TransactionType::In);
        assert_eq!(first.change_amount, 100);
        assert_eq!(first.cost_price, Some(12.5));
        assert_eq!(first.created_at, Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap());

        assert_eq!(import.transactions[1].reason.as_deref(), Some("Заказ #17"));
        assert_eq!(import.transactions[2].reason, None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T06:04:05+03:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02 03:04:05"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-01-02T03:04:05 "), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-02"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("02/01/2024"), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_history_file("/definitely/not/here.csv").is_err());
    }
}
