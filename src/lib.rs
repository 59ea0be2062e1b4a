// Mix Estimate - Core Library
// Catalog, cart, pricing and estimate export for the mixing/mastering menu

pub mod catalog;   // Service menu: base services, options, commercial multiplier
pub mod cart;      // Cart lines and mutation rules
pub mod pricing;   // Pure totals over (cart, catalog)
pub mod estimate;  // Snapshot handed to the exporter
pub mod export;    // Layout, PDF rendering, single-slot export guard
pub mod content;   // Portfolio / system / guide text
pub mod config;    // Runtime settings
pub mod app;       // State container driven by the terminal UI

// Re-export commonly used types
pub use catalog::{
    Catalog, CatalogEntry, CatalogError, EntryKind,
    ADD_TRACK_ID, COMMERCIAL_ID, FULL_MIX_ID, INCLUDED_TAG, SHORT_MIX_ID,
};
pub use cart::{Cart, CartError, CartLine, QuantityChange};
pub use pricing::{
    commercial_surcharge, format_amount, subtotal, total, total_tracks, Totals, BASE_TRACKS,
};
pub use estimate::{CommercialLine, Estimate, EstimateLine};
pub use export::{EstimateRenderer, ExportError, ExportSlot, Exporter, PdfRenderer};
pub use config::Settings;
pub use app::{App, CatalogRow, Focus, Notice, View};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
