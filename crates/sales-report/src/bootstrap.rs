use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sales_core::settings::Settings;
use sales_data::engine::DataSources;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Build the filter for `log_level`, falling back to `"info"` when the
/// directive is not recognised.
pub fn log_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr, or is appended to `log_file` when one is given,
/// so stdout carries only the JSON report.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = log_filter(log_level);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── Data-source resolution ─────────────────────────────────────────────────────

/// Resolve the three CSV paths from the settings.
pub fn data_sources(settings: &Settings) -> DataSources {
    DataSources {
        merchants: settings.merchants_path(),
        items: settings.items_path(),
        invoices: settings.invoices_path(),
    }
}

/// Every path in `sources` that does not exist.
pub fn missing_files(sources: &DataSources) -> Vec<&Path> {
    [&sources.merchants, &sources.items, &sources.invoices]
        .into_iter()
        .map(PathBuf::as_path)
        .filter(|p| !p.exists())
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
