//! Statistical questions over a loaded [`SalesEngine`].
//!
//! [`SalesAnalyst`] holds nothing but a borrow of the engine. Every query
//! recomputes its groupings from the repositories, so repeated calls give
//! identical results and nothing stale survives a reload.
//!
//! Headline figures are rounded to two decimals. Threshold selections compare
//! against the unrounded mean and standard deviation.

use std::collections::BTreeMap;

use chrono::Weekday;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sales_core::error::{Result, SalesError};
use sales_core::models::{InvoiceStatus, Item, Merchant, MerchantId};
use sales_core::statistics::{
    self, decimal_mean, round2, round_decimal2, rounded_mean, Distribution,
};
use sales_data::engine::SalesEngine;

use crate::grouping::{invoices_by_weekday, prices_by_merchant, MerchantCounts};

/// σ multiplier for "high item count" merchants.
pub const HIGH_ITEM_COUNT_SIGMAS: f64 = 1.0;
/// σ multiplier for top / bottom merchants by invoice count.
pub const INVOICE_OUTLIER_SIGMAS: f64 = 2.0;
/// σ multiplier for golden items.
pub const GOLDEN_ITEM_SIGMAS: f64 = 2.0;
/// σ multiplier for top invoice days.
pub const TOP_DAY_SIGMAS: f64 = 1.0;

// ── SalesAnalyst ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct SalesAnalyst<'a> {
    engine: &'a SalesEngine,
}

impl<'a> SalesAnalyst<'a> {
    pub fn new(engine: &'a SalesEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &'a SalesEngine {
        self.engine
    }

    /// Sample standard deviation of `values`, rounded to two decimals.
    pub fn standard_deviation(&self, values: &[f64]) -> Result<f64> {
        Ok(round2(statistics::standard_deviation(values)?))
    }

    // ── Grouping ─────────────────────────────────────────────────────────────

    /// Item count per merchant id, zero for merchants without items.
    pub fn items_count_by_merchant(&self) -> BTreeMap<MerchantId, usize> {
        self.item_counts().to_map()
    }

    /// Invoice count per merchant id, zero for merchants without invoices.
    pub fn invoices_count_by_merchant(&self) -> BTreeMap<MerchantId, usize> {
        self.invoice_counts().to_map()
    }

    /// Exact mean unit price of one merchant's items. Not rounded.
    ///
    /// Fails with [`SalesError::MerchantNotFound`] when `merchant_id` is not in
    /// the merchant repository. A known merchant with no items averages to zero.
    pub fn average_item_price_for_merchant(&self, merchant_id: MerchantId) -> Result<Decimal> {
        if !self.engine.merchants.contains(merchant_id) {
            return Err(SalesError::MerchantNotFound(merchant_id));
        }
        let prices: Vec<Decimal> = self
            .engine
            .items
            .find_all_by_merchant_id(merchant_id)
            .iter()
            .map(|item| item.unit_price)
            .collect();
        if prices.is_empty() {
            return Ok(Decimal::ZERO);
        }
        decimal_mean(&prices)
    }

    /// Items whose merchant id matches no merchant.
    pub fn orphaned_items(&self) -> usize {
        self.item_counts().orphaned()
    }

    /// Invoices whose merchant id matches no merchant.
    pub fn orphaned_invoices(&self) -> usize {
        self.invoice_counts().orphaned()
    }

    // ── Headline statistics ──────────────────────────────────────────────────

    /// Items per merchant, counting only items of known merchants.
    pub fn average_items_per_merchant(&self) -> Result<f64> {
        rounded_mean(&self.item_counts().sample())
    }

    pub fn average_items_per_merchant_standard_deviation(&self) -> Result<f64> {
        self.standard_deviation(&self.item_counts().sample())
    }

    /// Invoices per merchant, counting only invoices of known merchants.
    pub fn average_invoices_per_merchant(&self) -> Result<f64> {
        rounded_mean(&self.invoice_counts().sample())
    }

    pub fn average_invoices_per_merchant_standard_deviation(&self) -> Result<f64> {
        self.standard_deviation(&self.invoice_counts().sample())
    }

    /// Mean of the per-merchant average prices.
    ///
    /// Merchants without items have no average price and are left out.
    pub fn average_average_price_per_merchant(&self) -> Result<Decimal> {
        let averages = prices_by_merchant(&self.engine.merchants, self.engine.items.all())
            .iter()
            .map(|(_, prices)| decimal_mean(prices))
            .collect::<Result<Vec<Decimal>>>()?;
        Ok(round_decimal2(decimal_mean(&averages)?))
    }

    // ── Threshold selection ──────────────────────────────────────────────────

    /// Merchants whose item count is strictly above μ + 1σ.
    pub fn merchants_with_high_item_count(&self) -> Result<Vec<&'a Merchant>> {
        let counts = self.item_counts();
        let threshold = Distribution::from_sample(&counts.sample())?.upper(HIGH_ITEM_COUNT_SIGMAS);
        Ok(counts.select(|c| c as f64 > threshold))
    }

    /// Merchants whose invoice count is strictly above μ + 2σ.
    pub fn top_merchants_by_invoice_count(&self) -> Result<Vec<&'a Merchant>> {
        let counts = self.invoice_counts();
        let threshold = Distribution::from_sample(&counts.sample())?.upper(INVOICE_OUTLIER_SIGMAS);
        Ok(counts.select(|c| c as f64 > threshold))
    }

    /// Merchants whose invoice count is strictly below μ − 2σ.
    pub fn bottom_merchants_by_invoice_count(&self) -> Result<Vec<&'a Merchant>> {
        let counts = self.invoice_counts();
        let threshold = Distribution::from_sample(&counts.sample())?.lower(INVOICE_OUTLIER_SIGMAS);
        Ok(counts.select(|c| (c as f64) < threshold))
    }

    /// Merchants selling exactly one item.
    pub fn merchants_with_only_one_item(&self) -> Vec<&'a Merchant> {
        self.item_counts().select(|c| c == 1)
    }

    // ── Item prices ──────────────────────────────────────────────────────────

    /// Mean unit price over every item, rounded to two decimals.
    pub fn average_item_price(&self) -> Result<Decimal> {
        let prices: Vec<Decimal> = self.engine.items.all().iter().map(|i| i.unit_price).collect();
        Ok(round_decimal2(decimal_mean(&prices)?))
    }

    pub fn average_item_price_standard_deviation(&self) -> Result<f64> {
        self.standard_deviation(&self.price_sample())
    }

    /// Items priced strictly above μ + 2σ of all unit prices.
    pub fn golden_items(&self) -> Result<Vec<&'a Item>> {
        let threshold = Distribution::from_sample(&self.price_sample())?.upper(GOLDEN_ITEM_SIGMAS);
        let items = self.engine.items.all();
        Ok(items
            .iter()
            .filter(|i| i.unit_price.to_f64().is_some_and(|p| p > threshold))
            .collect())
    }

    // ── Invoice days and status ──────────────────────────────────────────────

    /// Invoices per creation weekday, Monday first.
    pub fn invoices_count_by_weekday(&self) -> Vec<(Weekday, usize)> {
        invoices_by_weekday(self.engine.invoices.all())
    }

    pub fn average_invoices_per_day(&self) -> Result<f64> {
        rounded_mean(&self.weekday_sample())
    }

    pub fn average_invoices_per_day_standard_deviation(&self) -> Result<f64> {
        self.standard_deviation(&self.weekday_sample())
    }

    /// Weekdays whose invoice count is strictly above μ + 1σ, Monday first.
    pub fn top_days_by_invoice_count(&self) -> Result<Vec<Weekday>> {
        let by_day = self.invoices_count_by_weekday();
        let threshold = Distribution::from_sample(&self.weekday_sample())?.upper(TOP_DAY_SIGMAS);
        Ok(by_day
            .into_iter()
            .filter(|&(_, c)| c as f64 > threshold)
            .map(|(day, _)| day)
            .collect())
    }

    /// Percentage (0–100, two decimals) of invoices with `status`.
    pub fn invoice_status(&self, status: InvoiceStatus) -> Result<f64> {
        let invoices = self.engine.invoices.all();
        let matching = invoices.iter().filter(|i| i.status == status).count();
        statistics::percentage(matching, invoices.len())
    }

    // ── Private ──────────────────────────────────────────────────────────────

    fn item_counts(&self) -> MerchantCounts<'a> {
        MerchantCounts::tally(&self.engine.merchants, &self.engine.items)
    }

    fn invoice_counts(&self) -> MerchantCounts<'a> {
        MerchantCounts::tally(&self.engine.merchants, &self.engine.invoices)
    }

    fn price_sample(&self) -> Vec<f64> {
        self.engine
            .items
            .all()
            .iter()
            .filter_map(|i| i.unit_price.to_f64())
            .collect()
    }

    fn weekday_sample(&self) -> Vec<f64> {
        statistics::counts_as_sample(self.invoices_count_by_weekday().into_iter().map(|(_, c)| c))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
