//! Aggregate statistics and outlier selection over a loaded sales dataset.
//!
//! [`SalesAnalyst`](analyst::SalesAnalyst) answers per-merchant count, price
//! and invoice questions; [`report`] bundles the answers for the CLI.

pub mod analyst;
pub mod grouping;
pub mod report;

#[cfg(test)]
mod test_support;

pub use analyst::SalesAnalyst;
pub use sales_core as core;
pub use sales_data as data;
