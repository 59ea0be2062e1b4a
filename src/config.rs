// ⚙️ Settings - Brand, output location, catalog source and log file
// Filled from CLI flags / environment by the binary; defaults match the
// studio's published site.

use crate::catalog::Catalog;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_BRAND: &str = "THE MILLI MIX";
pub const DEFAULT_LOG_FILE: &str = "mix-estimate.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Printed on estimates and used in the export filename
    pub brand: String,

    /// Where exported estimates are written
    pub output_dir: PathBuf,

    /// JSON catalog; the built-in menu when None
    pub catalog_path: Option<PathBuf>,

    /// Log destination while the terminal UI owns the screen
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            brand: DEFAULT_BRAND.to_string(),
            output_dir: PathBuf::from("."),
            catalog_path: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => {
                let catalog = Catalog::from_file(path)
                    .with_context(|| format!("Failed to load catalog: {:?}", path))?;
                tracing::info!(path = %path.display(), entries = catalog.len(), "catalog loaded");
                Ok(catalog)
            }
            None => Ok(Catalog::default()),
        }
    }
}
