//! Mean and dispersion primitives shared by every analyst query.
//!
//! These functions know nothing about merchants or items; callers extract
//! the numeric sequence first. All results are full precision; rounding for
//! display happens through [`round2`] / [`round_decimal2`].

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Result, SalesError};

/// Fewest observations for which a sample standard deviation is defined.
pub const MIN_DISPERSION_SAMPLE: usize = 2;

/// Arithmetic mean of `values`.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(SalesError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (Bessel's correction, divides by `n - 1`).
pub fn standard_deviation(values: &[f64]) -> Result<f64> {
    if values.len() < MIN_DISPERSION_SAMPLE {
        return Err(SalesError::InsufficientData {
            required: MIN_DISPERSION_SAMPLE,
            actual: values.len(),
        });
    }
    let mu = mean(values)?;
    let squared: f64 = values.iter().map(|x| (x - mu).powi(2)).sum();
    Ok((squared / (values.len() - 1) as f64).sqrt())
}

/// Exact mean of currency amounts.
pub fn decimal_mean(values: &[Decimal]) -> Result<Decimal> {
    if values.is_empty() {
        return Err(SalesError::EmptyInput);
    }
    let total: Decimal = values.iter().copied().sum();
    Ok(total / Decimal::from(values.len()))
}

/// Mean of `values` computed in decimal arithmetic, rounded half-up to two
/// decimal places.
///
/// Integer-valued samples (counts) convert exactly, so ties such as 201/200
/// round to 1.01 rather than to the float just below 1.005.
pub fn rounded_mean(values: &[f64]) -> Result<f64> {
    let exact: Vec<Decimal> = values.iter().filter_map(|&v| to_decimal(v)).collect();
    if exact.len() != values.len() {
        return Ok(round2(mean(values)?));
    }
    Ok(decimal_to_f64(round_decimal2(decimal_mean(&exact)?)))
}

/// `part` as a percentage of `whole`, rounded half-up to two decimal places.
pub fn percentage(part: usize, whole: usize) -> Result<f64> {
    if whole == 0 {
        return Err(SalesError::EmptyInput);
    }
    let pct = Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole);
    Ok(decimal_to_f64(round_decimal2(pct)))
}

/// Round half-up to two decimal places.
///
/// The float is first read back as its shortest decimal form, so 1.005 and
/// 0.285 round up like their written values. Non-finite input is returned
/// unchanged.
pub fn round2(value: f64) -> f64 {
    match to_decimal(value) {
        Some(d) => decimal_to_f64(round_decimal2(d)),
        None => value,
    }
}

/// Shortest decimal that reads back as `value`.
fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Round half-up to two decimal places.
pub fn round_decimal2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert counts into the `f64` sample the primitives expect.
pub fn counts_as_sample<I>(counts: I) -> Vec<f64>
where
    I: IntoIterator<Item = usize>,
{
    counts.into_iter().map(|c| c as f64).collect()
}

// ── Distribution ──────────────────────────────────────────────────────────────

/// Mean and sample standard deviation of one sample, used for
/// "k standard deviations from the mean" selections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub mean: f64,
    pub std_dev: f64,
}

impl Distribution {
    /// Compute μ and σ for `values`. Needs at least two observations.
    pub fn from_sample(values: &[f64]) -> Result<Self> {
        let std_dev = standard_deviation(values)?;
        let mean = mean(values)?;
        Ok(Self { mean, std_dev })
    }

    /// μ + kσ.
    pub fn upper(&self, k: f64) -> f64 {
        self.mean + k * self.std_dev
    }

    /// μ − kσ.
    pub fn lower(&self, k: f64) -> f64 {
        self.mean - k * self.std_dev
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
