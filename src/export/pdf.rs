// A4 PDF rendering of an estimate layout with the built-in Helvetica fonts.

use super::layout::{DocumentLayout, Weight, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::{EstimateRenderer, ExportError};
use crate::estimate::Estimate;
use printpdf::{BuiltinFont, Mm, PdfDocument};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl EstimateRenderer for PdfRenderer {
    fn render(&self, estimate: &Estimate) -> Result<Vec<u8>, ExportError> {
        let layout = DocumentLayout::build(estimate);
        let title = format!("{} Estimate {}", estimate.brand, estimate.reference());

        let (doc, first_page, first_layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Estimate");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;

        for (index, page) in layout.pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(
                    Mm(PAGE_WIDTH_MM),
                    Mm(PAGE_HEIGHT_MM),
                    format!("Estimate page {}", index + 1),
                )
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            for run in &page.runs {
                let font = match run.weight {
                    Weight::Regular => &regular,
                    Weight::Bold => &bold,
                };
                layer.use_text(
                    run.text.clone(),
                    run.size,
                    Mm(run.left_mm()),
                    Mm(PAGE_HEIGHT_MM - run.y_mm),
                    font,
                );
            }
        }

        tracing::debug!(pages = layout.page_count(), "estimate laid out");
        doc.save_to_bytes().map_err(render_error)
    }
}

fn render_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::{Catalog, SHORT_MIX_ID};
    use chrono::Utc;

    #[test]
    fn test_render_produces_pdf_bytes() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.select_base_service(&catalog, SHORT_MIX_ID).unwrap();
        cart.toggle_commercial();
        let estimate = Estimate::snapshot(&cart, &catalog, "THE MILLI MIX", Utc::now());

        let bytes = PdfRenderer.render(&estimate).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }
}
