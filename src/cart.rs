// 🛒 Cart Model - Selected services and their quantities
// Owns every mutation rule: exclusive base selection, quantity clamping,
// the commercial-use flag and "clear all".
//
// Invariants:
// - At most one base-service line at any time
// - No line ever has quantity 0 (it is removed instead)
// - An Err result never changes the cart

use crate::catalog::{Catalog, CatalogEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CART LINE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Back-reference into the catalog (not owned)
    pub entry_id: String,

    /// Always >= 1
    pub quantity: u32,
}

impl CartLine {
    fn new(entry_id: impl Into<String>, quantity: u32) -> Self {
        CartLine {
            entry_id: entry_id.into(),
            quantity,
        }
    }
}

// ============================================================================
// ERRORS & OUTCOMES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Catalog entry not found: {0}")]
    NotFound(String),

    #[error("Not a base service: {0}")]
    NotBaseService(String),

    #[error("Entry is included and cannot be adjusted: {0}")]
    Included(String),

    #[error("Quantity delta must be nonzero")]
    ZeroDelta,
}

/// What `adjust_quantity` did to the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// New line created with this quantity
    Added(u32),

    /// Existing line now has this quantity
    Updated(u32),

    /// Line dropped to zero or below and was removed
    Removed,

    /// No line and a non-positive delta: nothing to do
    Unchanged,
}

// ============================================================================
// CART
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    commercial: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `entry_id` the single base service, with quantity 1
    ///
    /// Other base lines (and lines sharing its exclusive group) are dropped,
    /// the remaining lines keep their order and the new line goes last.
    /// Reselecting the current base service resets it to quantity 1.
    pub fn select_base_service(&mut self, catalog: &Catalog, entry_id: &str) -> Result<(), CartError> {
        let entry = catalog
            .get(entry_id)
            .ok_or_else(|| CartError::NotFound(entry_id.to_string()))?;

        if !entry.is_base() {
            return Err(CartError::NotBaseService(entry_id.to_string()));
        }

        self.lines.retain(|line| line.entry_id != entry.id);
        self.evict_conflicts(catalog, entry);
        self.lines.push(CartLine::new(entry.id.clone(), 1));

        tracing::debug!(entry_id, "selected base service");
        Ok(())
    }

    /// Add `delta` to the line for `entry_id`
    ///
    /// Reaching zero or below removes the line. A missing line is created
    /// only for a positive delta, and only if the id resolves.
    pub fn adjust_quantity(
        &mut self,
        catalog: &Catalog,
        entry_id: &str,
        delta: i32,
    ) -> Result<QuantityChange, CartError> {
        if delta == 0 {
            return Err(CartError::ZeroDelta);
        }

        if let Some(entry) = catalog.get(entry_id) {
            if entry.is_included() {
                return Err(CartError::Included(entry_id.to_string()));
            }
        }

        if let Some(pos) = self.lines.iter().position(|line| line.entry_id == entry_id) {
            let next = i64::from(self.lines[pos].quantity) + i64::from(delta);
            if next <= 0 {
                self.lines.remove(pos);
                return Ok(QuantityChange::Removed);
            }
            let quantity = u32::try_from(next).unwrap_or(u32::MAX);
            self.lines[pos].quantity = quantity;
            return Ok(QuantityChange::Updated(quantity));
        }

        if delta < 0 {
            return Ok(QuantityChange::Unchanged);
        }

        let entry = catalog
            .get(entry_id)
            .ok_or_else(|| CartError::NotFound(entry_id.to_string()))?;

        let quantity = delta.unsigned_abs();
        self.evict_conflicts(catalog, entry);
        self.lines.push(CartLine::new(entry.id.clone(), quantity));
        Ok(QuantityChange::Added(quantity))
    }

    pub fn toggle_commercial(&mut self) {
        self.commercial = !self.commercial;
    }

    /// Empty every line and switch commercial use off
    pub fn clear(&mut self) {
        self.lines.clear();
        self.commercial = false;
    }

    fn evict_conflicts(&mut self, catalog: &Catalog, incoming: &CatalogEntry) {
        self.lines.retain(|line| match catalog.get(&line.entry_id) {
            Some(existing) => !existing.conflicts_with(incoming),
            None => true,
        });
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, entry_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.entry_id == entry_id)
    }

    /// Quantity in the cart, 0 when absent
    pub fn quantity_of(&self, entry_id: &str) -> u32 {
        self.line(entry_id).map(|line| line.quantity).unwrap_or(0)
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.line(entry_id).is_some()
    }

    /// The selected base-service line, if any
    pub fn base_line<'a>(&'a self, catalog: &Catalog) -> Option<&'a CartLine> {
        self.lines
            .iter()
            .find(|line| catalog.get(&line.entry_id).is_some_and(|e| e.is_base()))
    }

    pub fn is_commercial(&self) -> bool {
        self.commercial
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
