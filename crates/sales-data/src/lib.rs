//! Data-loading layer for the sales analyst.
//!
//! Reads the merchant, item and invoice CSV exports, indexes them into
//! repositories and wires those into a [`SalesEngine`](engine::SalesEngine).

pub mod engine;
pub mod reader;
pub mod repository;

pub use sales_core as core;
