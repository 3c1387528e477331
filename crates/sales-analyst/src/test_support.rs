//! Record builders and fixture engines shared by the unit tests.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sales_core::models::{
    CustomerId, Invoice, InvoiceId, InvoiceStatus, Item, ItemId, Merchant, MerchantId,
};
use sales_data::engine::SalesEngine;
use sales_data::repository::{InvoiceRepository, ItemRepository, MerchantRepository};

pub fn merchant(id: u64) -> Merchant {
    let ts = Utc.with_ymd_and_hms(2012, 3, 27, 14, 54, 9).unwrap();
    Merchant {
        id: MerchantId(id),
        name: format!("Merchant{id}"),
        created_at: ts,
        updated_at: ts,
    }
}

pub fn item(id: u64, merchant_id: u64, unit_price: Decimal) -> Item {
    let ts = Utc.with_ymd_and_hms(2016, 1, 11, 9, 34, 6).unwrap();
    Item {
        id: ItemId(id),
        name: format!("Item{id}"),
        description: String::new(),
        unit_price,
        merchant_id: MerchantId(merchant_id),
        created_at: ts,
        updated_at: ts,
    }
}

pub fn invoice_on(id: u64, merchant_id: u64, year: i32, month: u32, day: u32) -> Invoice {
    invoice_with_status(id, merchant_id, InvoiceStatus::Shipped, year, month, day)
}

pub fn invoice_with_status(
    id: u64,
    merchant_id: u64,
    status: InvoiceStatus,
    year: i32,
    month: u32,
    day: u32,
) -> Invoice {
    let ts = Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap();
    Invoice {
        id: InvoiceId(id),
        customer_id: CustomerId(1),
        merchant_id: MerchantId(merchant_id),
        status,
        created_at: ts,
        updated_at: ts,
    }
}

/// Merchants `1..=counts.len()`, merchant `n` owning `counts[n - 1]` items
/// priced at 1.00. No invoices.
pub fn engine_with_item_counts(counts: &[usize]) -> SalesEngine {
    let merchants: Vec<Merchant> = (1..=counts.len() as u64).map(merchant).collect();
    let mut items = Vec::new();
    let mut next_id = 1;
    for (idx, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            items.push(item(next_id, idx as u64 + 1, dec!(1.00)));
            next_id += 1;
        }
    }
    SalesEngine::new(
        MerchantRepository::from_records(merchants).unwrap(),
        ItemRepository::from_records(items).unwrap(),
        InvoiceRepository::default(),
    )
}

/// Three merchants:
/// * 12334112 sells items at 0.05 and 0.06
/// * 12334105 sells items at 15.00 and 25.00
/// * 12334113 sells nothing
pub fn price_fixture_engine() -> SalesEngine {
    let merchants = vec![merchant(12334112), merchant(12334105), merchant(12334113)];
    let items = vec![
        item(263395237, 12334112, dec!(0.05)),
        item(263395617, 12334112, dec!(0.06)),
        item(263396013, 12334105, dec!(15.00)),
        item(263396517, 12334105, dec!(25.00)),
    ];
    SalesEngine::new(
        MerchantRepository::from_records(merchants).unwrap(),
        ItemRepository::from_records(items).unwrap(),
        InvoiceRepository::default(),
    )
}

/// Three merchants with invoice counts [1, 1, 2] and statuses pending,
/// shipped, shipped, returned.
pub fn invoice_fixture_engine() -> SalesEngine {
    let merchants = vec![merchant(1), merchant(2), merchant(3)];
    let invoices = vec![
        invoice_with_status(1, 1, InvoiceStatus::Pending, 2012, 11, 19),
        invoice_with_status(2, 2, InvoiceStatus::Shipped, 2012, 11, 20),
        invoice_with_status(3, 3, InvoiceStatus::Shipped, 2012, 11, 21),
        invoice_with_status(4, 3, InvoiceStatus::Returned, 2012, 11, 22),
    ];
    SalesEngine::new(
        MerchantRepository::from_records(merchants).unwrap(),
        ItemRepository::from_records(vec![item(1, 1, dec!(2.00)), item(2, 2, dec!(4.00))]).unwrap(),
        InvoiceRepository::from_records(invoices).unwrap(),
    )
}
