//! Grouping of items and invoices by merchant and by weekday.
//!
//! Every per-merchant grouping is keyed by the merchant repository: one
//! entry per merchant, in repository order, zero for merchants without
//! records. Records whose foreign key matches no merchant are counted as
//! orphans and left out of every per-merchant figure.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;
use sales_core::models::{Invoice, Item, Merchant, MerchantId};
use sales_data::repository::{BelongsToMerchant, MerchantRepository, Repository};
use tracing::debug;

/// Monday-first, matching [`Weekday::num_days_from_monday`].
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ── MerchantCounts ────────────────────────────────────────────────────────────

/// Number of records attached to each merchant.
#[derive(Debug, Clone)]
pub struct MerchantCounts<'a> {
    entries: Vec<(&'a Merchant, usize)>,
    orphaned: usize,
}

impl<'a> MerchantCounts<'a> {
    /// Count `records` per merchant in `merchants`.
    pub fn tally<R: BelongsToMerchant>(
        merchants: &'a MerchantRepository,
        records: &Repository<R>,
    ) -> Self {
        let counts = records.count_by_merchant();
        let entries: Vec<(&'a Merchant, usize)> = merchants
            .all()
            .iter()
            .map(|m| (m, counts.get(&m.id).copied().unwrap_or(0)))
            .collect();

        let matched: usize = entries.iter().map(|(_, c)| c).sum();
        let orphaned = records.len() - matched;
        if orphaned > 0 {
            debug!(
                "{} {} record(s) reference no known merchant and are ignored",
                orphaned,
                R::KIND
            );
        }

        Self { entries, orphaned }
    }

    /// `(merchant, count)` pairs in repository order.
    pub fn entries(&self) -> &[(&'a Merchant, usize)] {
        &self.entries
    }

    /// Records whose merchant id matched no merchant.
    pub fn orphaned(&self) -> usize {
        self.orphaned
    }

    /// Counts as an `f64` sample, one observation per merchant.
    pub fn sample(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, c)| c as f64).collect()
    }

    pub fn to_map(&self) -> BTreeMap<MerchantId, usize> {
        self.entries.iter().map(|&(m, c)| (m.id, c)).collect()
    }

    /// Merchants whose count satisfies `keep`, in repository order.
    pub fn select(&self, keep: impl Fn(usize) -> bool) -> Vec<&'a Merchant> {
        self.entries
            .iter()
            .filter(|&&(_, c)| keep(c))
            .map(|&(m, _)| m)
            .collect()
    }
}

// ── Prices ────────────────────────────────────────────────────────────────────

/// Unit prices of each merchant's items, for merchants with at least one
/// item, in merchant repository order.
pub fn prices_by_merchant<'a>(
    merchants: &'a MerchantRepository,
    items: &[Item],
) -> Vec<(&'a Merchant, Vec<Decimal>)> {
    let mut grouped: BTreeMap<MerchantId, Vec<Decimal>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.merchant_id).or_default().push(item.unit_price);
    }

    merchants
        .all()
        .iter()
        .filter_map(|m| grouped.remove(&m.id).map(|prices| (m, prices)))
        .collect()
}

// ── Weekdays ──────────────────────────────────────────────────────────────────

/// Invoices per creation weekday, Monday first, all seven days present.
pub fn invoices_by_weekday(invoices: &[Invoice]) -> Vec<(Weekday, usize)> {
    let mut counts = [0usize; 7];
    for invoice in invoices {
        counts[invoice.created_at.weekday().num_days_from_monday() as usize] += 1;
    }
    WEEKDAYS.iter().copied().zip(counts).collect()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
