// 📄 Estimate Export - Render a snapshot and save it as a document
// Rendering sits behind `EstimateRenderer`; `Exporter` names and writes the
// file; `ExportSlot` keeps at most one export in flight.

pub mod layout;
pub mod pdf;
pub mod slot;

pub use layout::{DocumentLayout, PageLayout, TextRun};
pub use pdf::PdfRenderer;
pub use slot::{ExportResult, ExportSlot};

use crate::estimate::Estimate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the cart is empty")]
    EmptyCart,

    #[error("Failed to render estimate: {0}")]
    Render(String),

    #[error("Failed to write estimate file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export worker stopped before finishing")]
    WorkerLost,
}

/// Turns an estimate snapshot into document bytes
pub trait EstimateRenderer: Send + Sync {
    fn render(&self, estimate: &Estimate) -> Result<Vec<u8>, ExportError>;
}

// ============================================================================
// EXPORTER
// ============================================================================

#[derive(Clone)]
pub struct Exporter {
    renderer: Arc<dyn EstimateRenderer>,
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(renderer: Arc<dyn EstimateRenderer>, output_dir: impl Into<PathBuf>) -> Self {
        Exporter {
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// Exporter writing A4 PDFs into `output_dir`
    pub fn pdf(output_dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(PdfRenderer::default()), output_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render and save; returns the written path
    pub fn export(&self, estimate: &Estimate) -> Result<PathBuf, ExportError> {
        if estimate.is_empty() {
            return Err(ExportError::EmptyCart);
        }

        let path = self.output_dir.join(estimate.file_name());
        tracing::info!(path = %path.display(), lines = estimate.lines.len(), "rendering estimate");

        let bytes = self.renderer.render(estimate)?;

        fs::create_dir_all(&self.output_dir)?;
        fs::write(&path, &bytes)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "estimate saved");
        Ok(path)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::{Catalog, FULL_MIX_ID};
    use chrono::{TimeZone, Utc};

    pub(crate) struct FakeRenderer;

    impl EstimateRenderer for FakeRenderer {
        fn render(&self, estimate: &Estimate) -> Result<Vec<u8>, ExportError> {
            Ok(format!("estimate {}", estimate.totals.total).into_bytes())
        }
    }

    pub(crate) struct FailingRenderer;

    impl EstimateRenderer for FailingRenderer {
        fn render(&self, _estimate: &Estimate) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Render("canvas exploded".to_string()))
        }
    }

    fn sample_estimate() -> Estimate {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.select_base_service(&catalog, FULL_MIX_ID).unwrap();
        Estimate::snapshot(
            &cart,
            &catalog,
            "THE MILLI MIX",
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(Arc::new(FakeRenderer), dir.path());

        let path = exporter.export(&sample_estimate()).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "THE_MILLI_MIX_Estimate_1767225600000.pdf"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "estimate 30000");
    }

    #[test]
    fn test_export_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("estimates").join("2026");
        let exporter = Exporter::new(Arc::new(FakeRenderer), &nested);

        let path = exporter.export(&sample_estimate()).unwrap();

        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn test_brand_with_path_parts_stays_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(Arc::new(FakeRenderer), dir.path().join("out"));

        for brand in ["../escaped", "AC/DC"] {
            let mut estimate = sample_estimate();
            estimate.brand = brand.to_string();

            let path = exporter.export(&estimate).unwrap();

            assert_eq!(path.parent(), Some(exporter.output_dir()));
            assert!(path.exists());
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(fs::read_dir(exporter.output_dir()).unwrap().count(), 2);
    }

    #[test]
    fn test_export_empty_cart_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(Arc::new(FakeRenderer), dir.path());
        let mut estimate = sample_estimate();
        estimate.lines.clear();

        assert!(matches!(exporter.export(&estimate), Err(ExportError::EmptyCart)));
    }

    #[test]
    fn test_render_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(Arc::new(FailingRenderer), dir.path());

        let result = exporter.export(&sample_estimate());

        assert!(matches!(result, Err(ExportError::Render(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_pdf_exporter_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::pdf(dir.path());

        let path = exporter.export(&sample_estimate()).unwrap();
        let bytes = fs::read(path).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }
}
