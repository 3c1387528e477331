//! Shared types for the sales analyst: records and ids, the error type,
//! statistics primitives, CSV field processors and CLI settings.

pub mod data_processors;
pub mod error;
pub mod models;
pub mod settings;
pub mod statistics;

pub use error::{Result, SalesError};
pub use models::{CustomerId, Invoice, InvoiceId, InvoiceStatus, Item, ItemId, Merchant, MerchantId};
