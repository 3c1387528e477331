//! Serializable snapshots of analyst answers, one section per question
//! family, for the reporting layer.
//!
//! A failing query does not abort the report: its slot records the error
//! message instead, so one degenerate collection (say, a single merchant)
//! still leaves every other figure visible.

use rust_decimal::Decimal;
use sales_core::error::Result;
use sales_core::models::{InvoiceStatus, Item, ItemId, Merchant, MerchantId};
use serde::Serialize;

use crate::analyst::SalesAnalyst;
use crate::grouping::weekday_name;

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Either a computed value or the reason it could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Value(T),
    Error { error: String },
}

#[cfg(test)]
impl<T> Outcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Error { .. } => None,
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Error {
                error: e.to_string(),
            },
        }
    }
}

// ── Summaries ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantSummary {
    pub id: MerchantId,
    pub name: String,
}

impl From<&Merchant> for MerchantSummary {
    fn from(m: &Merchant) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub merchant_id: MerchantId,
    pub unit_price: Decimal,
}

impl From<&Item> for ItemSummary {
    fn from(i: &Item) -> Self {
        Self {
            id: i.id,
            name: i.name.clone(),
            merchant_id: i.merchant_id,
            unit_price: i.unit_price,
        }
    }
}

fn merchants(list: Result<Vec<&Merchant>>) -> Outcome<Vec<MerchantSummary>> {
    list.map(|ms| ms.into_iter().map(MerchantSummary::from).collect::<Vec<_>>())
        .into()
}

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub average_items_per_merchant: Outcome<f64>,
    pub average_items_per_merchant_standard_deviation: Outcome<f64>,
    pub merchants_with_high_item_count: Outcome<Vec<MerchantSummary>>,
    pub merchants_with_only_one_item: Vec<MerchantSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceReport {
    pub average_invoices_per_merchant: Outcome<f64>,
    pub average_invoices_per_merchant_standard_deviation: Outcome<f64>,
    pub top_merchants_by_invoice_count: Outcome<Vec<MerchantSummary>>,
    pub bottom_merchants_by_invoice_count: Outcome<Vec<MerchantSummary>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_average: Option<MerchantPrice>,
    pub average_average_price_per_merchant: Outcome<Decimal>,
    pub average_item_price: Outcome<Decimal>,
    pub average_item_price_standard_deviation: Outcome<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MerchantPrice {
    pub merchant_id: MerchantId,
    pub average_item_price: Outcome<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoldenItemReport {
    pub golden_items: Outcome<Vec<ItemSummary>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub invoices_by_weekday: Vec<(String, usize)>,
    pub average_invoices_per_day: Outcome<f64>,
    pub average_invoices_per_day_standard_deviation: Outcome<f64>,
    pub top_days_by_invoice_count: Outcome<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub pending: Outcome<f64>,
    pub shipped: Outcome<f64>,
    pub returned: Outcome<f64>,
}

/// Record counts, orphan counts, and every section.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub merchants: usize,
    pub items: usize,
    pub invoices: usize,
    pub orphaned_items: usize,
    pub orphaned_invoices: usize,
    pub item_counts: ItemReport,
    pub invoice_counts: InvoiceReport,
    pub prices: PriceReport,
    pub golden_items: GoldenItemReport,
    pub days: DayReport,
    pub status: StatusReport,
}

// ── Builders ──────────────────────────────────────────────────────────────────

impl SalesAnalyst<'_> {
    pub fn item_report(&self) -> ItemReport {
        ItemReport {
            average_items_per_merchant: self.average_items_per_merchant().into(),
            average_items_per_merchant_standard_deviation: self
                .average_items_per_merchant_standard_deviation()
                .into(),
            merchants_with_high_item_count: merchants(self.merchants_with_high_item_count()),
            merchants_with_only_one_item: self
                .merchants_with_only_one_item()
                .into_iter()
                .map(MerchantSummary::from)
                .collect(),
        }
    }

    pub fn invoice_report(&self) -> InvoiceReport {
        InvoiceReport {
            average_invoices_per_merchant: self.average_invoices_per_merchant().into(),
            average_invoices_per_merchant_standard_deviation: self
                .average_invoices_per_merchant_standard_deviation()
                .into(),
            top_merchants_by_invoice_count: merchants(self.top_merchants_by_invoice_count()),
            bottom_merchants_by_invoice_count: merchants(self.bottom_merchants_by_invoice_count()),
        }
    }

    /// Price figures; `merchant_id` adds that merchant's raw average.
    pub fn price_report(&self, merchant_id: Option<MerchantId>) -> PriceReport {
        PriceReport {
            merchant_average: merchant_id.map(|id| MerchantPrice {
                merchant_id: id,
                average_item_price: self.average_item_price_for_merchant(id).into(),
            }),
            average_average_price_per_merchant: self.average_average_price_per_merchant().into(),
            average_item_price: self.average_item_price().into(),
            average_item_price_standard_deviation: self
                .average_item_price_standard_deviation()
                .into(),
        }
    }

    pub fn golden_item_report(&self) -> GoldenItemReport {
        GoldenItemReport {
            golden_items: self
                .golden_items()
                .map(|items| items.into_iter().map(ItemSummary::from).collect::<Vec<_>>())
                .into(),
        }
    }

    pub fn day_report(&self) -> DayReport {
        DayReport {
            invoices_by_weekday: self
                .invoices_count_by_weekday()
                .into_iter()
                .map(|(day, c)| (weekday_name(day).to_string(), c))
                .collect(),
            average_invoices_per_day: self.average_invoices_per_day().into(),
            average_invoices_per_day_standard_deviation: self
                .average_invoices_per_day_standard_deviation()
                .into(),
            top_days_by_invoice_count: self
                .top_days_by_invoice_count()
                .map(|days| {
                    days.into_iter()
                        .map(|d| weekday_name(d).to_string())
                        .collect::<Vec<_>>()
                })
                .into(),
        }
    }

    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            pending: self.invoice_status(InvoiceStatus::Pending).into(),
            shipped: self.invoice_status(InvoiceStatus::Shipped).into(),
            returned: self.invoice_status(InvoiceStatus::Returned).into(),
        }
    }

    /// Run every question once.
    pub fn report(&self, merchant_id: Option<MerchantId>) -> AnalysisReport {
        let engine = self.engine();
        AnalysisReport {
            merchants: engine.merchants.len(),
            items: engine.items.len(),
            invoices: engine.invoices.len(),
            orphaned_items: self.orphaned_items(),
            orphaned_invoices: self.orphaned_invoices(),
            item_counts: self.item_report(),
            invoice_counts: self.invoice_report(),
            prices: self.price_report(merchant_id),
            golden_items: self.golden_item_report(),
            days: self.day_report(),
            status: self.status_report(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
