// 💰 Pricing Engine - Pure projections of the cart
// subtotal, commercial surcharge, total and track count.
//
// Nothing here holds state: every value is recomputed from (cart, catalog)
// on demand. Amounts saturate at u64::MAX instead of wrapping.

use crate::cart::{Cart, CartLine};
use crate::catalog::{Catalog, ADD_TRACK_ID, SHORT_MIX_ID};
use serde::{Deserialize, Serialize};

/// Tracks included with any base service
pub const BASE_TRACKS: u32 = 3;

/// Extra multiples added for the short-form service (10x total)
pub const SHORT_FORM_SURCHARGE_FACTOR: u64 = 9;

/// Extra multiples added for every other line (5x total)
pub const STANDARD_SURCHARGE_FACTOR: u64 = 4;

// ============================================================================
// PER-LINE
// ============================================================================

pub fn line_total(catalog: &Catalog, line: &CartLine) -> u64 {
    catalog
        .unit_price(&line.entry_id)
        .saturating_mul(u64::from(line.quantity))
}

/// Surcharge factor applied to a line when commercial use is on
pub fn surcharge_factor(entry_id: &str) -> u64 {
    if entry_id == SHORT_MIX_ID {
        SHORT_FORM_SURCHARGE_FACTOR
    } else {
        STANDARD_SURCHARGE_FACTOR
    }
}

pub fn line_surcharge(catalog: &Catalog, line: &CartLine) -> u64 {
    line_total(catalog, line).saturating_mul(surcharge_factor(&line.entry_id))
}

fn saturating_sum(amounts: impl Iterator<Item = u64>) -> u64 {
    amounts.fold(0, u64::saturating_add)
}

// ============================================================================
// CART-WIDE
// ============================================================================

pub fn subtotal(cart: &Cart, catalog: &Catalog) -> u64 {
    saturating_sum(cart.lines().iter().map(|line| line_total(catalog, line)))
}

/// Zero unless commercial use is enabled
pub fn commercial_surcharge(cart: &Cart, catalog: &Catalog) -> u64 {
    if !cart.is_commercial() {
        return 0;
    }
    saturating_sum(cart.lines().iter().map(|line| line_surcharge(catalog, line)))
}

pub fn total(cart: &Cart, catalog: &Catalog) -> u64 {
    subtotal(cart, catalog).saturating_add(commercial_surcharge(cart, catalog))
}

/// 3 tracks once a base service is chosen, plus any "add track" quantity
pub fn total_tracks(cart: &Cart, catalog: &Catalog) -> u32 {
    let base = if cart.base_line(catalog).is_some() {
        BASE_TRACKS
    } else {
        0
    };
    base.saturating_add(cart.quantity_of(ADD_TRACK_ID))
}

// ============================================================================
// TOTALS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: u64,
    pub commercial_surcharge: u64,
    pub total: u64,
    pub total_tracks: u32,
}

impl Totals {
    pub fn compute(cart: &Cart, catalog: &Catalog) -> Self {
        let subtotal = subtotal(cart, catalog);
        let commercial_surcharge = commercial_surcharge(cart, catalog);

        Totals {
            subtotal,
            commercial_surcharge,
            total: subtotal.saturating_add(commercial_surcharge),
            total_tracks: total_tracks(cart, catalog),
        }
    }
}

/// Format whole won with thousands separators: 1234567 -> "1,234,567"
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
