// 🧾 Estimate Snapshot - Frozen view of the cart for export
// Captures display text, amounts and totals at one instant so the
// exporter never reads live cart state.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::pricing::{line_total, Totals};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateLine {
    pub entry_id: String,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub amount: u64,
}

/// The commercial-use row, present only when the flag is on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercialLine {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub brand: String,
    pub generated_at: DateTime<Utc>,
    pub lines: Vec<EstimateLine>,
    pub commercial: Option<CommercialLine>,
    pub totals: Totals,
}

impl Estimate {
    pub fn snapshot(
        cart: &Cart,
        catalog: &Catalog,
        brand: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let lines = cart
            .lines()
            .iter()
            .filter_map(|line| {
                let entry = catalog.get(&line.entry_id)?;
                Some(EstimateLine {
                    entry_id: entry.id.clone(),
                    name: entry.name.clone(),
                    description: entry.description.clone(),
                    unit: entry.unit.clone(),
                    unit_price: entry.price,
                    quantity: line.quantity,
                    amount: line_total(catalog, line),
                })
            })
            .collect();

        let totals = Totals::compute(cart, catalog);

        let commercial = cart.is_commercial().then(|| CommercialLine {
            name: catalog.commercial.name.clone(),
            description: catalog.commercial.description.clone(),
            unit: catalog.commercial.unit.clone(),
            amount: totals.commercial_surcharge,
        });

        Estimate {
            brand: brand.into(),
            generated_at,
            lines,
            commercial,
            totals,
        }
    }

    /// Reference number printed on the document (unix millis)
    pub fn reference(&self) -> i64 {
        self.generated_at.timestamp_millis()
    }

    /// Local calendar date for display, e.g. "2026-10-16"
    pub fn display_date(&self) -> String {
        self.generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// `<brand>_Estimate_<unix millis>.pdf`
    pub fn file_name(&self) -> String {
        file_name(&self.brand, self.reference())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Anything outside letters, digits, `-` and `_` becomes `_`, so the brand
/// can never name a directory or climb out of the output dir.
pub fn file_name(brand: &str, timestamp_millis: i64) -> String {
    let brand: String = brand
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}_Estimate_{}.pdf", brand, timestamp_millis)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ADD_TRACK_ID, FULL_MIX_ID, SHORT_MIX_ID};
    use chrono::TimeZone;

    fn at_new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("THE MILLI MIX", 1767225600000),
            "THE_MILLI_MIX_Estimate_1767225600000.pdf"
        );
        assert_eq!(file_name("  Studio ", 5), "Studio_Estimate_5.pdf");
    }

    #[test]
    fn test_file_name_never_contains_path_parts() {
        assert_eq!(file_name("AC/DC", 7), "AC_DC_Estimate_7.pdf");
        assert_eq!(file_name("../escaped", 7), "___escaped_Estimate_7.pdf");
        assert_eq!(file_name("a\\b:c", 7), "a_b_c_Estimate_7.pdf");
        assert_eq!(file_name("밀리 믹스", 7), "밀리_믹스_Estimate_7.pdf");

        let name = file_name("../../etc/x", 7);
        assert_eq!(std::path::Path::new(&name).components().count(), 1);
    }

    #[test]
    fn test_snapshot_lines_and_totals() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.select_base_service(&catalog, FULL_MIX_ID).unwrap();
        cart.adjust_quantity(&catalog, ADD_TRACK_ID, 2).unwrap();

        let estimate = Estimate::snapshot(&cart, &catalog, "THE MILLI MIX", at_new_year());

        assert_eq!(estimate.lines.len(), 2);
        assert_eq!(estimate.lines[0].entry_id, FULL_MIX_ID);
        assert_eq!(estimate.lines[1].quantity, 2);
        assert_eq!(estimate.lines[1].amount, 20_000);
        assert!(estimate.commercial.is_none());
        assert_eq!(estimate.totals.total, 50_000);
        assert_eq!(estimate.totals.total_tracks, 5);
        assert_eq!(estimate.reference(), 1767225600000);
        assert_eq!(estimate.file_name(), "THE_MILLI_MIX_Estimate_1767225600000.pdf");
    }

    #[test]
    fn test_snapshot_commercial_line() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.select_base_service(&catalog, SHORT_MIX_ID).unwrap();
        cart.toggle_commercial();

        let estimate = Estimate::snapshot(&cart, &catalog, "Studio", at_new_year());
        let commercial = estimate.commercial.expect("commercial line");

        assert_eq!(commercial.amount, 90_000);
        assert_eq!(commercial.unit, "5x ~ 10x");
        assert_eq!(estimate.totals.total, 100_000);
    }

    #[test]
    fn test_snapshot_is_detached_from_cart() {
        let catalog = Catalog::default();
        let mut cart = Cart::new();
        cart.select_base_service(&catalog, SHORT_MIX_ID).unwrap();

        let estimate = Estimate::snapshot(&cart, &catalog, "Studio", at_new_year());
        cart.clear();

        assert_eq!(estimate.lines.len(), 1);
        assert!(!estimate.is_empty());
    }
}
