//! # Configuration
//!
//! Settings are managed by [`confique`], loaded in priority order:
//! 1. **Environment variables**: `KONTOR_DATA_DIR`, `KONTOR_TAX_RATE`,
//!    `KONTOR_PURCHASE_PREFIX`.
//! 2. **Config file**: `kontor.toml`, when a path is supplied.
//! 3. **Compiled defaults**.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Directory holding the collection JSON files |
//! | `tax_rate` | `0.08` | Tax rate applied to purchase-order subtotals |
//! | `purchase_prefix` | `"PO"` | Prefix for generated purchase numbers |

use crate::error::{KontorError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KontorConfig {
    /// Directory holding the collection files. When absent, the
    /// OS-appropriate data directory is used.
    #[config(env = "KONTOR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Tax rate applied to purchase subtotals at creation time.
    #[config(default = 0.08, env = "KONTOR_TAX_RATE")]
    pub tax_rate: f64,

    /// Prefix for generated purchase numbers (e.g. "PO" -> PO-2026-001).
    #[config(default = "PO", env = "KONTOR_PURCHASE_PREFIX")]
    pub purchase_prefix: String,
}

impl Default for KontorConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            tax_rate: 0.08,
            purchase_prefix: "PO".to_string(),
        }
    }
}

impl KontorConfig {
    /// Load configuration from environment and an optional `kontor.toml`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let config = builder
            .load()
            .map_err(|err| KontorError::Store(format!("failed to load config: {}", err)))?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if !(0.0..1.0).contains(&self.tax_rate) {
            return Err(KontorError::Validation(format!(
                "tax_rate must be within [0, 1), got {}",
                self.tax_rate
            )));
        }
        if self.purchase_prefix.trim().is_empty() {
            return Err(KontorError::Validation(
                "purchase_prefix must not be empty".to_string(),
            ));
        }
        Ok(self)
    }

    /// The directory collection files live in: the configured override, or
    /// the OS data directory, or `.kontor` as a last resort.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "kontor")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".kontor"))
    }
}
