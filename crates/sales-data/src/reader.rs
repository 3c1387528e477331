//! CSV loading for the three sales exports.
//!
//! Columns are mapped by header name, so column order is free and extra
//! columns are ignored. Any row that cannot be mapped fails the whole load
//! with [`SalesError::InvalidRecord`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sales_core::data_processors::{PriceProcessor, TimestampProcessor};
use sales_core::error::{Result, SalesError};
use sales_core::models::{
    CustomerId, Invoice, InvoiceId, InvoiceStatus, Item, ItemId, Merchant, MerchantId,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

// ── Raw rows ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MerchantRow {
    id: u64,
    name: String,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    id: u64,
    name: String,
    #[serde(default)]
    description: String,
    unit_price: String,
    merchant_id: u64,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct InvoiceRow {
    id: u64,
    customer_id: u64,
    merchant_id: u64,
    status: String,
    created_at: String,
    updated_at: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every merchant row from `path`.
pub fn load_merchants(path: &Path) -> Result<Vec<Merchant>> {
    let rows: Vec<(u64, MerchantRow)> = read_rows(path)?;
    let merchants = rows
        .into_iter()
        .map(|(line, row)| {
            let ctx = RowContext { path, line };
            Ok(Merchant {
                id: MerchantId(row.id),
                name: row.name,
                created_at: ctx.timestamp("created_at", &row.created_at)?,
                updated_at: ctx.timestamp("updated_at", &row.updated_at)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} merchants from {}", merchants.len(), path.display());
    Ok(merchants)
}

/// Load every item row from `path`. `unit_price` is read as integer cents.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let rows: Vec<(u64, ItemRow)> = read_rows(path)?;
    let items = rows
        .into_iter()
        .map(|(line, row)| {
            let ctx = RowContext { path, line };
            let unit_price = PriceProcessor::from_cents(&row.unit_price)
                .ok_or_else(|| ctx.invalid(format!("invalid unit_price \"{}\"", row.unit_price)))?;
            Ok(Item {
                id: ItemId(row.id),
                name: row.name,
                description: row.description,
                unit_price,
                merchant_id: MerchantId(row.merchant_id),
                created_at: ctx.timestamp("created_at", &row.created_at)?,
                updated_at: ctx.timestamp("updated_at", &row.updated_at)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Load every invoice row from `path`.
pub fn load_invoices(path: &Path) -> Result<Vec<Invoice>> {
    let rows: Vec<(u64, InvoiceRow)> = read_rows(path)?;
    let invoices = rows
        .into_iter()
        .map(|(line, row)| {
            let ctx = RowContext { path, line };
            let status: InvoiceStatus = row.status.parse().map_err(|e| ctx.invalid(e))?;
            Ok(Invoice {
                id: InvoiceId(row.id),
                customer_id: CustomerId(row.customer_id),
                merchant_id: MerchantId(row.merchant_id),
                status,
                created_at: ctx.timestamp("created_at", &row.created_at)?,
                updated_at: ctx.timestamp("updated_at", &row.updated_at)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} invoices from {}", invoices.len(), path.display());
    Ok(invoices)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Location of a row, for error reporting.
struct RowContext<'a> {
    path: &'a Path,
    line: u64,
}

impl RowContext<'_> {
    fn invalid(&self, reason: impl Into<String>) -> SalesError {
        SalesError::InvalidRecord {
            path: self.path.to_path_buf(),
            line: self.line,
            reason: reason.into(),
        }
    }

    fn timestamp(&self, column: &str, raw: &str) -> Result<DateTime<Utc>> {
        TimestampProcessor::parse_str(raw)
            .ok_or_else(|| self.invalid(format!("invalid {column} \"{raw}\"")))
    }
}

/// Read `path` as a headed CSV and deserialize each record into `T`,
/// keeping the 1-based line number of every row.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<(u64, T)>> {
    let file = std::fs::File::open(path).map_err(|source| SalesError::FileRead {
        path: PathBuf::from(path),
        source,
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| SalesError::InvalidRecord {
                path: path.to_path_buf(),
                line,
                reason: e.to_string(),
            })?;
        rows.push((line, row));
    }
    Ok(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn write(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = tmp.path().join(name);
        std::fs::write(&path, content).expect("write csv");
        path
    }

    const TS: &str = "2012-03-27 14:54:09 UTC";

    // ── load_merchants ───────────────────────────────────────────────────────

    #[test]
    fn test_load_merchants() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "merchants.csv",
            &format!(
                "id,name,created_at,updated_at\n\
                 12334105,Shopin1901,2010-12-10,2011-12-04\n\
                 12334112,Candisart,{TS},{TS}\n"
            ),
        );

        let merchants = load_merchants(&path).expect("load");
        assert_eq!(merchants.len(), 2);
        assert_eq!(merchants[0].id, MerchantId(12334105));
        assert_eq!(merchants[0].name, "Shopin1901");
        assert_eq!(merchants[0].created_at.year(), 2010);
        assert_eq!(merchants[1].name, "Candisart");
    }

    #[test]
    fn test_load_merchants_column_order_and_extra_columns() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "merchants.csv",
            &format!("name,extra,updated_at,id,created_at\nMiniatureBikez,x,{TS},12334113,{TS}\n"),
        );

        let merchants = load_merchants(&path).expect("load");
        assert_eq!(merchants[0].id, MerchantId(12334113));
        assert_eq!(merchants[0].name, "MiniatureBikez");
    }

    #[test]
    fn test_load_missing_file_is_file_read_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = load_merchants(&tmp.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, SalesError::FileRead { .. }));
    }

    #[test]
    fn test_load_header_only_is_empty() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(&tmp, "merchants.csv", "id,name,created_at,updated_at\n");
        assert!(load_merchants(&path).expect("load").is_empty());
    }

    #[test]
    fn test_load_merchants_bad_id_reports_line() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "merchants.csv",
            &format!("id,name,created_at,updated_at\n1,Ok,{TS},{TS}\nabc,Broken,{TS},{TS}\n"),
        );

        match load_merchants(&path).unwrap_err() {
            SalesError::InvalidRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ── load_items ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_items_converts_cents() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "items.csv",
            &format!(
                "id,name,description,unit_price,merchant_id,created_at,updated_at\n\
                 263395237,510+ RealPush Icon Set,\"Icons, many\",1200,12334141,{TS},{TS}\n"
            ),
        );

        let items = load_items(&path).expect("load");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ItemId(263395237));
        assert_eq!(items[0].description, "Icons, many");
        assert_eq!(items[0].unit_price, dec!(12.00));
        assert_eq!(items[0].merchant_id, MerchantId(12334141));
    }

    #[test]
    fn test_load_items_bad_price() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "items.csv",
            &format!(
                "id,name,description,unit_price,merchant_id,created_at,updated_at\n\
                 1,Pen,,-5,7,{TS},{TS}\n"
            ),
        );

        match load_items(&path).unwrap_err() {
            SalesError::InvalidRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("unit_price"), "reason = {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ── load_invoices ────────────────────────────────────────────────────────

    #[test]
    fn test_load_invoices() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "invoices.csv",
            "id,customer_id,merchant_id,status,created_at,updated_at\n\
             1,1,12335938,pending,2009-02-07,2014-03-15\n\
             2,1,12334753,shipped,2012-11-23,2013-04-14\n",
        );

        let invoices = load_invoices(&path).expect("load");
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].status, InvoiceStatus::Pending);
        assert_eq!(invoices[1].merchant_id, MerchantId(12334753));
        assert_eq!(invoices[1].created_at.weekday(), chrono::Weekday::Fri);
    }

    #[test]
    fn test_load_invoices_bad_status() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "invoices.csv",
            "id,customer_id,merchant_id,status,created_at,updated_at\n\
             1,1,7,misplaced,2009-02-07,2014-03-15\n",
        );

        match load_invoices(&path).unwrap_err() {
            SalesError::InvalidRecord { reason, .. } => assert!(reason.contains("misplaced")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_invoices_bad_timestamp() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(
            &tmp,
            "invoices.csv",
            "id,customer_id,merchant_id,status,created_at,updated_at\n\
             1,1,7,shipped,someday,2014-03-15\n",
        );

        match load_invoices(&path).unwrap_err() {
            SalesError::InvalidRecord { reason, .. } => assert!(reason.contains("created_at")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
