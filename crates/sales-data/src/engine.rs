//! Composition root: the three repositories of one loaded dataset.

use std::path::{Path, PathBuf};

use sales_core::error::Result;
use tracing::{debug, info, warn};

use crate::reader::{load_invoices, load_items, load_merchants};
use crate::repository::{
    BelongsToMerchant, InvoiceRepository, ItemRepository, MerchantRepository, Record, Repository,
};

// ── DataSources ───────────────────────────────────────────────────────────────

/// File locations of the three CSV exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub merchants: PathBuf,
    pub items: PathBuf,
    pub invoices: PathBuf,
}

impl DataSources {
    /// `merchants.csv`, `items.csv` and `invoices.csv` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            merchants: dir.join("merchants.csv"),
            items: dir.join("items.csv"),
            invoices: dir.join("invoices.csv"),
        }
    }
}

// ── SalesEngine ───────────────────────────────────────────────────────────────

/// Owns the merchant, item and invoice repositories for one analysis session.
///
/// The dataset is immutable once built; reload by constructing a new engine.
#[derive(Debug, Clone, Default)]
pub struct SalesEngine {
    pub merchants: MerchantRepository,
    pub items: ItemRepository,
    pub invoices: InvoiceRepository,
}

impl SalesEngine {
    /// Wire pre-built repositories together.
    pub fn new(
        merchants: MerchantRepository,
        items: ItemRepository,
        invoices: InvoiceRepository,
    ) -> Self {
        Self {
            merchants,
            items,
            invoices,
        }
    }

    /// Load all three CSV files and index them.
    pub fn from_csv(sources: &DataSources) -> Result<Self> {
        let load_start = std::time::Instant::now();

        let merchants = MerchantRepository::from_records(load_merchants(&sources.merchants)?)?;
        let items = ItemRepository::from_records(load_items(&sources.items)?)?;
        let invoices = InvoiceRepository::from_records(load_invoices(&sources.invoices)?)?;

        debug!(
            "Indexed dataset in {:.3}s",
            load_start.elapsed().as_secs_f64()
        );
        info!(
            "Loaded {} merchants, {} items, {} invoices",
            merchants.len(),
            items.len(),
            invoices.len()
        );

        let engine = Self::new(merchants, items, invoices);
        engine.warn_orphans(&engine.items);
        engine.warn_orphans(&engine.invoices);
        Ok(engine)
    }

    /// Records in `repo` whose merchant id is not in the merchant repository.
    pub fn orphan_count<R: BelongsToMerchant>(&self, repo: &Repository<R>) -> usize {
        repo.all()
            .iter()
            .filter(|r| !self.merchants.contains(r.merchant_id()))
            .count()
    }

    fn warn_orphans<R: BelongsToMerchant>(&self, repo: &Repository<R>) {
        let orphans = self.orphan_count(repo);
        if orphans > 0 {
            warn!(
                "{} {} record(s) reference an unknown merchant",
                orphans,
                <R as Record>::KIND
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
