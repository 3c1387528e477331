//! In-memory, id-indexed record collections.
//!
//! One generic [`Repository`] serves all three record kinds. The
//! [`Record`] and [`BelongsToMerchant`] traits supply the id and foreign-key
//! access the repository needs, so no per-kind lookup code exists.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use sales_core::error::{Result, SalesError};
use sales_core::models::{Invoice, InvoiceId, Item, ItemId, Merchant, MerchantId};

// ── Traits ────────────────────────────────────────────────────────────────────

/// A loaded record with a unique identifier.
pub trait Record {
    type Id: Copy + Eq + Hash + Into<u64> + std::fmt::Debug;

    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}

/// A record carrying a foreign key to a merchant.
pub trait BelongsToMerchant: Record {
    fn merchant_id(&self) -> MerchantId;
}

impl Record for Merchant {
    type Id = MerchantId;
    const KIND: &'static str = "merchant";

    fn id(&self) -> MerchantId {
        self.id
    }
}

impl Record for Item {
    type Id = ItemId;
    const KIND: &'static str = "item";

    fn id(&self) -> ItemId {
        self.id
    }
}

impl BelongsToMerchant for Item {
    fn merchant_id(&self) -> MerchantId {
        self.merchant_id
    }
}

impl Record for Invoice {
    type Id = InvoiceId;
    const KIND: &'static str = "invoice";

    fn id(&self) -> InvoiceId {
        self.id
    }
}

impl BelongsToMerchant for Invoice {
    fn merchant_id(&self) -> MerchantId {
        self.merchant_id
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

/// Records of one kind, kept in load order and indexed by id.
#[derive(Debug, Clone)]
pub struct Repository<R: Record> {
    records: Vec<R>,
    by_id: HashMap<R::Id, usize>,
}

pub type MerchantRepository = Repository<Merchant>;
pub type ItemRepository = Repository<Item>;
pub type InvoiceRepository = Repository<Invoice>;

impl<R: Record> Repository<R> {
    /// Build the repository, rejecting duplicate ids.
    pub fn from_records(records: Vec<R>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if by_id.insert(record.id(), idx).is_some() {
                return Err(SalesError::DuplicateId {
                    kind: R::KIND,
                    id: record.id().into(),
                });
            }
        }
        Ok(Self { records, by_id })
    }

    /// Every record, in load order.
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn find_by_id(&self, id: R::Id) -> Option<&R> {
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, id: R::Id) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: BelongsToMerchant> Repository<R> {
    /// Records whose foreign key is `merchant_id`, in load order.
    pub fn find_all_by_merchant_id(&self, merchant_id: MerchantId) -> Vec<&R> {
        self.records
            .iter()
            .filter(|r| r.merchant_id() == merchant_id)
            .collect()
    }

    /// Number of records per foreign key. Keys are whatever ids appear in
    /// the records; they are not checked against any merchant repository.
    pub fn count_by_merchant(&self) -> BTreeMap<MerchantId, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.merchant_id()).or_insert(0) += 1;
        }
        counts
    }
}

impl<R: Record> Default for Repository<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
