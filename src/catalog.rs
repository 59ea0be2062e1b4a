// 🎚️ Service Catalog - Fixed menu of mixing/mastering services
// Base services, add-on options and the commercial-use multiplier.
//
// The catalog is built once at startup (compiled-in or loaded from JSON)
// and never mutated afterwards. Cart lines only hold entry ids.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Short-form base service (priced at 10x under commercial use)
pub const SHORT_MIX_ID: &str = "short_mix";

/// Full-length base service
pub const FULL_MIX_ID: &str = "full_mix";

/// "Add one track" option, counted on top of the base tracks
pub const ADD_TRACK_ID: &str = "add_track";

/// Commercial-use multiplier descriptor
pub const COMMERCIAL_ID: &str = "commercial";

/// Feature tag for options bundled at no cost (not quantity-adjustable)
pub const INCLUDED_TAG: &str = "INCLUDED";

// ============================================================================
// ENTRY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Main service, mutually exclusive with other base services
    Base,

    /// Additive add-on
    Option,

    /// Flag-like surcharge, never a cart line
    Multiplier,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Base => "base",
            EntryKind::Option => "option",
            EntryKind::Multiplier => "multiplier",
        }
    }
}

// ============================================================================
// CATALOG ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique key (e.g., "full_mix")
    pub id: String,

    pub name: String,

    /// Display text, may contain line breaks
    pub description: String,

    /// Unit price in KRW (whole won)
    pub price: u64,

    pub kind: EntryKind,

    /// Pricing unit label (e.g., "per track")
    #[serde(default)]
    pub unit: String,

    /// Display tags; `INCLUDED` marks a bundled, fixed option
    #[serde(default)]
    pub features: Vec<String>,

    /// Entries sharing a group replace each other in the cart
    #[serde(default)]
    pub exclusive_group: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: EntryKind,
        price: u64,
    ) -> Self {
        CatalogEntry {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            kind,
            unit: String::new(),
            features: Vec::new(),
            exclusive_group: None,
        }
    }

    /// Builder: add description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set unit label
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Builder: add feature tag
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Builder: set exclusive group
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.exclusive_group = Some(group.into());
        self
    }

    pub fn is_base(&self) -> bool {
        self.kind == EntryKind::Base
    }

    /// Bundled at zero marginal cost, cannot be quantity-adjusted
    pub fn is_included(&self) -> bool {
        self.features.iter().any(|f| f == INCLUDED_TAG)
    }

    /// True when selecting `other` must evict this entry
    pub fn conflicts_with(&self, other: &CatalogEntry) -> bool {
        if self.id == other.id {
            return false;
        }
        if self.is_base() && other.is_base() {
            return true;
        }
        match (&self.exclusive_group, &other.exclusive_group) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate catalog id: {0}")]
    DuplicateId(String),

    #[error("Entry {id} is listed as {expected} but has kind {actual}")]
    WrongKind {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
}

// ============================================================================
// CATALOG
// ============================================================================

/// The full service menu: two groups plus one commercial descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub base_services: Vec<CatalogEntry>,
    pub options: Vec<CatalogEntry>,
    pub commercial: CatalogEntry,
}

impl Catalog {
    /// Load and validate a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check id uniqueness and that every group holds the right kind
    pub fn validate(&self) -> Result<(), CatalogError> {
        let groups: [(&[CatalogEntry], EntryKind); 3] = [
            (self.base_services.as_slice(), EntryKind::Base),
            (self.options.as_slice(), EntryKind::Option),
            (std::slice::from_ref(&self.commercial), EntryKind::Multiplier),
        ];

        let mut seen = HashSet::new();
        for (entries, expected) in groups {
            for entry in entries {
                if entry.kind != expected {
                    return Err(CatalogError::WrongKind {
                        id: entry.id.clone(),
                        expected: expected.as_str(),
                        actual: entry.kind.as_str(),
                    });
                }
                if !seen.insert(entry.id.as_str()) {
                    return Err(CatalogError::DuplicateId(entry.id.clone()));
                }
            }
        }

        Ok(())
    }

    /// Resolve a cart-able entry (base services and options only)
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries().find(|entry| entry.id == id)
    }

    /// Base services followed by options, in display order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.base_services.iter().chain(self.options.iter())
    }

    pub fn unit_price(&self, id: &str) -> u64 {
        self.get(id).map(|entry| entry.price).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.base_services.len() + self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Catalog {
    /// The studio's published menu
    fn default() -> Self {
        const MAIN_SERVICE: &str = "main_service";

        let base_services = vec![
            CatalogEntry::new(SHORT_MIX_ID, "Short Mixing & Mastering", EntryKind::Base, 10_000)
                .with_description(
                    "Under 1 minute short-form (Reels, Shorts)\n\
                     Engineering tuned for cover-song content.",
                )
                .with_unit("per song")
                .in_group(MAIN_SERVICE)
                .with_feature("Pitch/timing correction & basic FX included")
                .with_feature("3 tracks included"),
            CatalogEntry::new(FULL_MIX_ID, "Mixing & Mastering", EntryKind::Base, 30_000)
                .with_description(
                    "Full song under 3 minutes (cover or original)\n\
                     3 tracks including the instrumental.",
                )
                .with_unit("per song")
                .in_group(MAIN_SERVICE)
                .with_feature("Pitch/timing correction is a separate option.")
                .with_feature("Priced per vocalist; more people are an option."),
        ];

        let options = vec![
            CatalogEntry::new("mastering_only", "Mastering", EntryKind::Option, 0)
                .with_description("Included by default.")
                .with_unit("per song")
                .with_feature(INCLUDED_TAG),
            CatalogEntry::new("pitch_correction", "Pitch/Timing Correction", EntryKind::Option, 10_000)
                .with_description("Corrects vocal pitch and timing.")
                .with_unit("per track"),
            CatalogEntry::new("revision", "Mix Revision", EntryKind::Option, 10_000)
                .with_description("One revision is free. Further revisions are paid.")
                .with_unit("per round"),
            CatalogEntry::new("add_person", "Additional Vocalist", EntryKind::Option, 10_000)
                .with_description("Mixing & mastering for one more person.")
                .with_unit("per person"),
            CatalogEntry::new(ADD_TRACK_ID, "Add 1 Track", EntryKind::Option, 10_000)
                .with_description("Cost per track beyond the included tracks.")
                .with_unit("per track"),
            CatalogEntry::new("add_minute", "Add 1 Minute", EntryKind::Option, 10_000)
                .with_description("Per extra minute beyond 3 minutes.")
                .with_unit("per minute"),
            CatalogEntry::new("remove_signature", "Remove Signature Sound", EntryKind::Option, 50_000)
                .with_description("Removes the THE MILLI MIX signature sound.")
                .with_unit("per song"),
            CatalogEntry::new("private_portfolio", "Exclude From Portfolio", EntryKind::Option, 50_000)
                .with_description("The work is not published as a portfolio sample.")
                .with_unit("per song"),
        ];

        let commercial = CatalogEntry::new(COMMERCIAL_ID, "Commercial Use", EntryKind::Multiplier, 0)
            .with_description(
                "For monetised releases (streaming, YouTube revenue). \
                 Short 10x / others 5x.",
            )
            .with_unit("5x ~ 10x");

        Catalog {
            base_services,
            options,
            commercial,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.base_services.len(), 2);
        assert_eq!(catalog.options.len(), 8);
        assert_eq!(catalog.commercial.kind, EntryKind::Multiplier);
    }

    #[test]
    fn test_get_resolves_base_and_options_only() {
        let catalog = Catalog::default();

        assert_eq!(catalog.get(SHORT_MIX_ID).map(|e| e.price), Some(10_000));
        assert_eq!(catalog.get(ADD_TRACK_ID).map(|e| e.kind), Some(EntryKind::Option));
        assert!(catalog.get(COMMERCIAL_ID).is_none());
        assert!(catalog.get("nope").is_none());
        assert_eq!(catalog.unit_price("nope"), 0);
    }

    #[test]
    fn test_included_option() {
        let catalog = Catalog::default();
        let mastering = catalog.get("mastering_only").unwrap();

        assert!(mastering.is_included());
        assert_eq!(mastering.price, 0);
        assert!(!catalog.get("revision").unwrap().is_included());
    }

    #[test]
    fn test_conflicts() {
        let catalog = Catalog::default();
        let short = catalog.get(SHORT_MIX_ID).unwrap();
        let full = catalog.get(FULL_MIX_ID).unwrap();
        let track = catalog.get(ADD_TRACK_ID).unwrap();

        assert!(short.conflicts_with(full));
        assert!(!short.conflicts_with(short));
        assert!(!track.conflicts_with(full));

        let a = CatalogEntry::new("a", "A", EntryKind::Option, 1).in_group("g");
        let b = CatalogEntry::new("b", "B", EntryKind::Option, 1).in_group("g");
        assert!(a.conflicts_with(&b));
    }

    #[test]
    fn test_from_json_round_trips_default() {
        let json = serde_json::to_string(&Catalog::default()).unwrap();
        let loaded = Catalog::from_json(&json).unwrap();
        assert_eq!(loaded, Catalog::default());
    }

    #[test]
    fn test_from_json_with_optional_fields_missing() {
        let json = r#"{
            "base_services": [
                { "id": "mix", "name": "Mix", "description": "", "price": 100, "kind": "base" }
            ],
            "options": [],
            "commercial": { "id": "commercial", "name": "Commercial", "description": "", "price": 0, "kind": "multiplier" }
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        let mix = catalog.get("mix").unwrap();
        assert!(mix.features.is_empty());
        assert_eq!(mix.exclusive_group, None);
        assert_eq!(mix.unit, "");
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut catalog = Catalog::default();
        let mut dup = catalog.options[1].clone();
        dup.id = SHORT_MIX_ID.to_string();
        catalog.options.push(dup);

        match catalog.validate() {
            Err(CatalogError::DuplicateId(id)) => assert_eq!(id, SHORT_MIX_ID),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_wrong_kind() {
        let mut catalog = Catalog::default();
        catalog.options[0].kind = EntryKind::Base;

        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::WrongKind { expected: "option", actual: "base", .. })
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let result = Catalog::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
