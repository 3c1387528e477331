use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses the timestamp forms found in the sales CSV exports.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Attempt to parse `s` into a UTC [`DateTime`].
    ///
    /// Handles:
    /// * `2012-03-27 14:54:09 UTC` (the export default)
    /// * RFC 3339, including a `Z` suffix
    /// * date-time and date-only patterns, read as UTC
    pub fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        let naive_part = s.strip_suffix(" UTC").unwrap_or(s);

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(naive_part, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        if let Ok(date) = chrono::NaiveDate::parse_from_str(naive_part, "%Y-%m-%d") {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive));
        }

        None
    }
}

// ── PriceProcessor ────────────────────────────────────────────────────────────

/// Converts the integer-cents price column into a dollar [`Decimal`].
pub struct PriceProcessor;

impl PriceProcessor {
    /// `"1200"` → `12.00`. Returns `None` for anything that is not a
    /// non-negative number.
    pub fn from_cents(raw: &str) -> Option<Decimal> {
        let cents = Decimal::from_str(raw.trim()).ok()?;
        if cents.is_sign_negative() && !cents.is_zero() {
            return None;
        }
        Some(cents / Decimal::ONE_HUNDRED)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
