use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SalesError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregate statistics over merchant, item and invoice exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-report",
    about = "Aggregate statistics over merchant, item and invoice exports",
    version
)]
pub struct Settings {
    /// Directory holding merchants.csv, items.csv and invoices.csv
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Merchants CSV (overrides --data-dir)
    #[arg(long)]
    pub merchants: Option<PathBuf>,

    /// Items CSV (overrides --data-dir)
    #[arg(long)]
    pub items: Option<PathBuf>,

    /// Invoices CSV (overrides --data-dir)
    #[arg(long)]
    pub invoices: Option<PathBuf>,

    /// Question to answer
    #[arg(long, default_value = "summary", value_parser = ["summary", "items", "invoices", "prices", "golden-items", "days", "status"])]
    pub query: String,

    /// Merchant id for the per-merchant average price (with --query prices)
    #[arg(long)]
    pub merchant_id: Option<u64>,

    /// Logging level
    #[arg(long, default_value = "info", value_parser = LOG_LEVELS)]
    pub log_level: String,

    /// Log file path (stderr when absent)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// JSON config file (defaults to ~/.sales-analyst/config.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

// ── FileConfig ─────────────────────────────────────────────────────────────────

/// Optional defaults read from a JSON config file.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchants: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoices: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Default location: `~/.sales-analyst/config.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// The config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".sales-analyst").join("config.json")
    }

    /// Read and parse the config at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SalesError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Like [`load_from`](Self::load_from), but an absent file yields `None`.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(path).map(Some)
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and merge the config file underneath them.
    pub fn load() -> Result<Self> {
        Self::load_impl(std::env::args_os().collect(), &FileConfig::config_path())
    }

    /// Full implementation, taking the argument list and the default config
    /// path so tests can redirect both.
    ///
    /// An explicit `--config` must exist; the default path may be absent.
    pub fn load_impl(args: Vec<std::ffi::OsString>, default_config: &Path) -> Result<Self> {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        let file = match &settings.config {
            Some(explicit) => Some(FileConfig::load_from(explicit)?),
            None => FileConfig::load_optional(default_config)?,
        };

        if let Some(file) = file {
            settings.merge_file_config(file, &matches);
        }

        if settings.debug {
            settings.log_level = "debug".to_string();
        }

        if !LOG_LEVELS.contains(&settings.log_level.as_str()) {
            return Err(SalesError::Config(format!(
                "invalid log_level \"{}\"",
                settings.log_level
            )));
        }

        Ok(settings)
    }

    /// Fill in every value not given explicitly on the command line.
    fn merge_file_config(&mut self, file: FileConfig, matches: &clap::ArgMatches) {
        if !is_arg_explicitly_set(matches, "data_dir") {
            if let Some(v) = file.data_dir {
                self.data_dir = v;
            }
        }
        if !is_arg_explicitly_set(matches, "merchants") && self.merchants.is_none() {
            self.merchants = file.merchants;
        }
        if !is_arg_explicitly_set(matches, "items") && self.items.is_none() {
            self.items = file.items;
        }
        if !is_arg_explicitly_set(matches, "invoices") && self.invoices.is_none() {
            self.invoices = file.invoices;
        }
        if !is_arg_explicitly_set(matches, "log_level") {
            if let Some(v) = file.log_level {
                self.log_level = v.to_lowercase();
            }
        }
    }

    pub fn merchants_path(&self) -> PathBuf {
        self.merchants
            .clone()
            .unwrap_or_else(|| self.data_dir.join("merchants.csv"))
    }

    pub fn items_path(&self) -> PathBuf {
        self.items
            .clone()
            .unwrap_or_else(|| self.data_dir.join("items.csv"))
    }

    pub fn invoices_path(&self) -> PathBuf {
        self.invoices
            .clone()
            .unwrap_or_else(|| self.data_dir.join("invoices.csv"))
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
