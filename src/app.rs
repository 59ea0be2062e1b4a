// 🧭 App State - The single state container behind the terminal UI
// Holds catalog, cart, current view and the export gate. Rendering code
// reads from here and calls these methods; it owns no business logic.

use crate::cart::{Cart, CartError, CartLine, QuantityChange};
use crate::catalog::{Catalog, CatalogEntry};
use crate::estimate::Estimate;
use crate::export::{ExportResult, ExportSlot, Exporter};
use crate::pricing::Totals;
use chrono::Utc;
use std::path::PathBuf;

// ============================================================================
// VIEWS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Portfolio,
    System,
    Guide,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::Portfolio, View::System, View::Guide];

    pub fn next(&self) -> Self {
        match self {
            View::Home => View::Portfolio,
            View::Portfolio => View::System,
            View::System => View::Guide,
            View::Guide => View::Home,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            View::Home => View::Guide,
            View::Portfolio => View::Home,
            View::System => View::Portfolio,
            View::Guide => View::System,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            View::Home => "Services",
            View::Portfolio => "Portfolio",
            View::System => "System",
            View::Guide => "Guide",
        }
    }
}

/// One selectable row of the services view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogRow {
    Base(usize),
    Option(usize),
    Commercial,
}

/// Pane of the services view that receives navigation and +/- keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Catalog,
    Cart,
}

/// Outcome of the last export, shown until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved(PathBuf),
    Failed(String),
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    catalog: Catalog,
    cart: Cart,
    view: View,
    cursor: usize,
    focus: Focus,
    cart_cursor: usize,
    brand: String,
    exporter: Exporter,
    export_slot: ExportSlot,
    confirming_export: bool,
    notice: Option<Notice>,
}

impl App {
    pub fn new(catalog: Catalog, exporter: Exporter, brand: impl Into<String>) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            view: View::Home,
            cursor: 0,
            focus: Focus::Catalog,
            cart_cursor: 0,
            brand: brand.into(),
            exporter,
            export_slot: ExportSlot::new(),
            confirming_export: false,
            notice: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.cart, &self.catalog)
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn previous_view(&mut self) {
        self.view = self.view.previous();
    }

    pub fn rows(&self) -> Vec<CatalogRow> {
        let mut rows: Vec<CatalogRow> = (0..self.catalog.base_services.len())
            .map(CatalogRow::Base)
            .collect();
        rows.extend((0..self.catalog.options.len()).map(CatalogRow::Option));
        rows.push(CatalogRow::Commercial);
        rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_row(&self) -> Option<CatalogRow> {
        self.rows().get(self.cursor).copied()
    }

    pub fn next_row(&mut self) {
        match self.focus {
            Focus::Catalog => self.cursor = wrap_next(self.cursor, self.rows().len()),
            Focus::Cart => self.cart_cursor = wrap_next(self.cart_cursor, self.cart.len()),
        }
    }

    pub fn previous_row(&mut self) {
        match self.focus {
            Focus::Catalog => self.cursor = wrap_previous(self.cursor, self.rows().len()),
            Focus::Cart => self.cart_cursor = wrap_previous(self.cart_cursor, self.cart.len()),
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Switch between the catalog and the cart sidebar; the sidebar only
    /// takes focus while it has lines
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Catalog if !self.cart.is_empty() => Focus::Cart,
            _ => Focus::Catalog,
        };
        self.sync_cart_cursor();
    }

    pub fn cart_cursor(&self) -> usize {
        self.cart_cursor
    }

    pub fn selected_cart_line(&self) -> Option<&CartLine> {
        self.cart.lines().get(self.cart_cursor)
    }

    fn sync_cart_cursor(&mut self) {
        if self.cart.is_empty() {
            self.focus = Focus::Catalog;
            self.cart_cursor = 0;
        } else {
            self.cart_cursor = self.cart_cursor.min(self.cart.len() - 1);
        }
    }

    /// Catalog entry behind a row; None for the commercial toggle
    pub fn entry_for(&self, row: CatalogRow) -> Option<&CatalogEntry> {
        match row {
            CatalogRow::Base(i) => self.catalog.base_services.get(i),
            CatalogRow::Option(i) => self.catalog.options.get(i),
            CatalogRow::Commercial => None,
        }
    }

    // ------------------------------------------------------------------------
    // Cart actions
    // ------------------------------------------------------------------------

    /// Enter on the services view: select, add one, or toggle
    pub fn activate(&mut self) {
        if self.focus == Focus::Cart {
            self.step_selected(1);
            return;
        }
        match self.selected_row() {
            Some(CatalogRow::Base(i)) => {
                if let Some(id) = self.catalog.base_services.get(i).map(|e| e.id.clone()) {
                    self.select_base_service(&id);
                }
            }
            Some(CatalogRow::Option(_)) => self.step_selected(1),
            Some(CatalogRow::Commercial) => self.toggle_commercial(),
            None => {}
        }
    }

    pub fn increment(&mut self) {
        self.step_selected(1);
    }

    pub fn decrement(&mut self) {
        self.step_selected(-1);
    }

    fn step_selected(&mut self, delta: i32) {
        if self.focus == Focus::Cart {
            if let Some(id) = self.selected_cart_line().map(|l| l.entry_id.clone()) {
                self.adjust_quantity(&id, delta);
            }
            return;
        }
        let Some(row) = self.selected_row() else {
            return;
        };
        match self.entry_for(row).map(|e| e.id.clone()) {
            Some(id) => {
                self.adjust_quantity(&id, delta);
            }
            None => self.toggle_commercial(),
        }
    }

    pub fn select_base_service(&mut self, entry_id: &str) {
        if let Err(err) = self.cart.select_base_service(&self.catalog, entry_id) {
            log_rejection(&err);
        }
        self.sync_cart_cursor();
    }

    /// Errors are logged and otherwise leave the cart as it was
    pub fn adjust_quantity(&mut self, entry_id: &str, delta: i32) -> Option<QuantityChange> {
        let result = self.cart.adjust_quantity(&self.catalog, entry_id, delta);
        self.sync_cart_cursor();
        match result {
            Ok(change) => Some(change),
            Err(err) => {
                log_rejection(&err);
                None
            }
        }
    }

    pub fn toggle_commercial(&mut self) {
        self.cart.toggle_commercial();
        tracing::debug!(enabled = self.cart.is_commercial(), "commercial use toggled");
    }

    /// "Clear all"
    pub fn clear(&mut self) {
        self.cart.clear();
        self.sync_cart_cursor();
        tracing::debug!("cart cleared");
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Route to the guide and ask for confirmation before exporting
    pub fn request_export(&mut self) {
        if self.cart.is_empty() || self.export_slot.is_busy() {
            return;
        }
        self.view = View::Guide;
        self.confirming_export = true;
        self.notice = None;
    }

    /// User acknowledged the guide; returns true when an export started
    pub fn confirm_export(&mut self) -> bool {
        if !self.confirming_export {
            return false;
        }
        self.confirming_export = false;

        let estimate = Estimate::snapshot(&self.cart, &self.catalog, self.brand.clone(), Utc::now());
        let exporter = self.exporter.clone();
        let started = self
            .export_slot
            .try_start(move || exporter.export(&estimate));

        if started {
            tracing::info!("estimate export started");
        }
        started
    }

    /// "Read the guide more": close the prompt, stay on the guide
    pub fn dismiss_export(&mut self) {
        self.confirming_export = false;
    }

    pub fn is_confirming_export(&self) -> bool {
        self.confirming_export
    }

    pub fn is_exporting(&self) -> bool {
        self.export_slot.is_busy()
    }

    /// Called from the event loop; picks up a finished export
    pub fn tick(&mut self) {
        if let Some(result) = self.export_slot.poll() {
            self.finish_export(result);
        }
    }

    /// Block until the in-flight export (if any) completes
    pub fn wait_for_export(&mut self) {
        if let Some(result) = self.export_slot.wait() {
            self.finish_export(result);
        }
    }

    fn finish_export(&mut self, result: ExportResult) {
        self.notice = Some(match result {
            Ok(path) => Notice::Saved(path),
            Err(err) => {
                tracing::error!(error = %err, "estimate export failed");
                Notice::Failed(err.to_string())
            }
        });
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

fn wrap_next(index: usize, len: usize) -> usize {
    if index + 1 >= len {
        0
    } else {
        index + 1
    }
}

fn wrap_previous(index: usize, len: usize) -> usize {
    if index == 0 {
        len.saturating_sub(1)
    } else {
        index - 1
    }
}

fn log_rejection(err: &CartError) {
    tracing::warn!(error = %err, "cart action ignored");
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ADD_TRACK_ID, FULL_MIX_ID, SHORT_MIX_ID};
    use crate::export::tests::{FailingRenderer, FakeRenderer};
    use std::sync::Arc;

    fn app_in(dir: &std::path::Path) -> App {
        App::new(
            Catalog::default(),
            Exporter::new(Arc::new(FakeRenderer), dir),
            "THE MILLI MIX",
        )
    }

    #[test]
    fn test_view_cycle() {
        let mut view = View::Home;
        for _ in 0..4 {
            view = view.next();
        }
        assert_eq!(view, View::Home);
        assert_eq!(View::Home.previous(), View::Guide);
        assert_eq!(View::System.title(), "System");
    }

    #[test]
    fn test_rows_cover_catalog_and_commercial() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path());
        let rows = app.rows();

        assert_eq!(rows.len(), 2 + 8 + 1);
        assert_eq!(rows[0], CatalogRow::Base(0));
        assert_eq!(rows[2], CatalogRow::Option(0));
        assert_eq!(*rows.last().unwrap(), CatalogRow::Commercial);
    }

    #[test]
    fn test_cursor_wraps() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.previous_row();
        assert_eq!(app.selected_row(), Some(CatalogRow::Commercial));
        app.next_row();
        assert_eq!(app.selected_row(), Some(CatalogRow::Base(0)));
    }

    #[test]
    fn test_cart_focus_needs_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.toggle_focus();
        assert_eq!(app.focus(), Focus::Catalog);

        app.select_base_service(SHORT_MIX_ID);
        app.toggle_focus();
        assert_eq!(app.focus(), Focus::Cart);
        app.toggle_focus();
        assert_eq!(app.focus(), Focus::Catalog);
    }

    #[test]
    fn test_cart_sidebar_steps_selected_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.select_base_service(FULL_MIX_ID);
        app.adjust_quantity(ADD_TRACK_ID, 1);
        app.adjust_quantity("revision", 1);
        let catalog_cursor = app.cursor();

        app.toggle_focus();
        app.next_row();
        assert_eq!(app.selected_cart_line().unwrap().entry_id, ADD_TRACK_ID);

        app.increment();
        app.increment();
        assert_eq!(app.cart().quantity_of(ADD_TRACK_ID), 3);
        assert_eq!(app.cursor(), catalog_cursor);

        app.previous_row();
        app.previous_row();
        assert_eq!(app.selected_cart_line().unwrap().entry_id, "revision");
        app.decrement();
        assert!(!app.cart().contains("revision"));
        // Cursor falls back onto the last remaining line
        assert_eq!(app.cart_cursor(), 1);
        assert_eq!(app.focus(), Focus::Cart);
    }

    #[test]
    fn test_removing_last_line_returns_focus_to_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.adjust_quantity("revision", 1);

        app.toggle_focus();
        app.decrement();

        assert!(app.cart().is_empty());
        assert_eq!(app.focus(), Focus::Catalog);
        assert_eq!(app.cart_cursor(), 0);

        app.adjust_quantity("revision", 1);
        app.toggle_focus();
        app.clear();
        assert_eq!(app.focus(), Focus::Catalog);
    }

    #[test]
    fn test_activate_dispatches_by_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        // Base(1) = full mix
        app.next_row();
        app.activate();
        assert!(app.cart().contains(FULL_MIX_ID));

        // Option(1) = pitch correction
        app.next_row();
        app.next_row();
        app.activate();
        app.increment();
        assert_eq!(app.cart().quantity_of("pitch_correction"), 2);
        app.decrement();
        assert_eq!(app.cart().quantity_of("pitch_correction"), 1);

        app.previous_row();
        app.activate();
        assert!(app.cart().line("mastering_only").is_none());

        app.previous_row();
        app.previous_row();
        app.previous_row();
        assert_eq!(app.selected_row(), Some(CatalogRow::Commercial));
        app.activate();
        assert!(app.cart().is_commercial());
    }

    #[test]
    fn test_invalid_ids_are_noops() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.select_base_service(ADD_TRACK_ID);
        assert_eq!(app.adjust_quantity("ghost", 1), None);
        assert!(app.cart().is_empty());
    }

    #[test]
    fn test_totals_follow_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.select_base_service(SHORT_MIX_ID);
        app.adjust_quantity(ADD_TRACK_ID, 1);
        app.toggle_commercial();

        let totals = app.totals();
        assert_eq!(totals.total_tracks, 4);
        assert_eq!(totals.total, 10_000 * 10 + 10_000 * 5);

        app.clear();
        assert_eq!(app.totals(), Totals::default());
        assert!(!app.cart().is_commercial());
    }

    #[test]
    fn test_export_requires_nonempty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.request_export();

        assert!(!app.is_confirming_export());
        assert_eq!(app.view(), View::Home);
    }

    #[test]
    fn test_export_is_gated_by_guide_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.select_base_service(FULL_MIX_ID);

        assert!(!app.confirm_export());

        app.request_export();
        assert_eq!(app.view(), View::Guide);
        assert!(app.is_confirming_export());

        app.dismiss_export();
        assert!(!app.is_confirming_export());
        assert!(!app.confirm_export());
        assert!(!app.is_exporting());
    }

    #[test]
    fn test_confirmed_export_saves_file_and_keeps_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.select_base_service(FULL_MIX_ID);
        app.adjust_quantity(ADD_TRACK_ID, 2);
        let before = app.cart().clone();

        app.request_export();
        assert!(app.confirm_export());
        app.wait_for_export();

        match app.notice() {
            Some(Notice::Saved(path)) => {
                assert!(path.exists());
                let name = path.file_name().unwrap().to_str().unwrap();
                assert!(name.starts_with("THE_MILLI_MIX_Estimate_"));
                assert!(name.ends_with(".pdf"));
            }
            other => panic!("expected saved notice, got {:?}", other),
        }
        assert_eq!(app.cart(), &before);
        assert!(!app.is_exporting());
    }

    #[test]
    fn test_export_failure_surfaces_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(
            Catalog::default(),
            Exporter::new(Arc::new(FailingRenderer), dir.path()),
            "Studio",
        );
        app.select_base_service(SHORT_MIX_ID);
        let before = app.cart().clone();

        app.request_export();
        app.confirm_export();
        app.wait_for_export();

        assert!(matches!(app.notice(), Some(Notice::Failed(msg)) if msg.contains("canvas exploded")));
        assert_eq!(app.cart(), &before);
        assert!(!app.is_exporting());

        app.dismiss_notice();
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_no_second_export_while_one_is_pending() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.select_base_service(FULL_MIX_ID);

        // Occupy the slot with a job that waits for release
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        assert!(app.export_slot.try_start(move || {
            let _ = release_rx.recv();
            Ok(PathBuf::from("held.pdf"))
        }));

        app.set_view(View::Home);
        app.request_export();
        assert!(!app.is_confirming_export());
        assert_eq!(app.view(), View::Home);

        release_tx.send(()).unwrap();
        app.wait_for_export();

        assert_eq!(app.notice(), Some(&Notice::Saved(PathBuf::from("held.pdf"))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
