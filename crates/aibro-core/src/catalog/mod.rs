//! Catalog domain module.
//!
//! # Module Structure
//!
//! - `model`: `Announcement` and `Category`
//! - `constants`: region and industry vocabularies
//! - `filter`: the catalog filter shared by browsing and candidate narrowing
//! - `normalizer`: tolerant raw-record mapping

mod constants;
mod filter;
mod model;
mod normalizer;

pub use constants::{
    INDUSTRIES, NATIONWIDE, OTHER_INDUSTRY, REGIONS, is_known_industry, is_known_region,
};
pub use filter::{CatalogFilter, RegionMode, filter_announcements};
pub use model::{Announcement, Category};
pub use normalizer::{
    NO_DESCRIPTION, NO_TARGET, NO_TITLE, UNKNOWN_REGION, normalize, normalize_with,
};

use std::collections::HashSet;

/// Immutable, in-memory set of announcements.
///
/// Identifiers are unique: when built from records sharing a `policy_id`,
/// the first record is kept and later ones are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Announcement>,
}

impl Catalog {
    pub fn new(items: Vec<Announcement>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if seen.insert(item.policy_id.clone()) {
                // Catalog entries never carry ranking overlays.
                unique.push(item.without_ranking());
            } else {
                tracing::warn!(policy_id = %item.policy_id, "Dropping duplicate catalog entry");
            }
        }
        Self { items: unique }
    }

    /// Builds a catalog from raw, heterogeneous records.
    pub fn from_raw(records: &[serde_json::Value]) -> Self {
        Self::new(records.iter().map(normalize).collect())
    }

    pub fn items(&self) -> &[Announcement] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, policy_id: &str) -> Option<&Announcement> {
        self.items.iter().find(|a| a.policy_id == policy_id)
    }

    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Announcement> {
        filter_announcements(&self.items, filter)
    }
}
