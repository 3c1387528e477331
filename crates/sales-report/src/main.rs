mod bootstrap;

use anyhow::{bail, Result};
use sales_analyst::SalesAnalyst;
use sales_core::models::MerchantId;
use sales_core::settings::Settings;
use sales_data::engine::SalesEngine;

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Sales report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Query: {}, data dir: {}",
        settings.query,
        settings.data_dir.display()
    );

    let sources = bootstrap::data_sources(&settings);
    let missing = bootstrap::missing_files(&sources);
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        bail!("missing input file(s): {}", names.join(", "));
    }

    let engine = SalesEngine::from_csv(&sources)?;
    let analyst = SalesAnalyst::new(&engine);
    let merchant_id = settings.merchant_id.map(MerchantId::from);

    let output = match settings.query.as_str() {
        "summary" => serde_json::to_string_pretty(&analyst.report(merchant_id))?,
        "items" => serde_json::to_string_pretty(&analyst.item_report())?,
        "invoices" => serde_json::to_string_pretty(&analyst.invoice_report())?,
        "prices" => serde_json::to_string_pretty(&analyst.price_report(merchant_id))?,
        "golden-items" => serde_json::to_string_pretty(&analyst.golden_item_report())?,
        "days" => serde_json::to_string_pretty(&analyst.day_report())?,
        "status" => serde_json::to_string_pretty(&analyst.status_report())?,
        unknown => bail!("unknown query: {unknown}"),
    };

    println!("{output}");
    Ok(())
}
