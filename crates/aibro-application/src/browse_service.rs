//! Catalog browsing: filtered listings, deadlines and saved announcements.

use std::collections::HashSet;
use std::sync::Arc;

use aibro_core::catalog::{Announcement, Catalog, CatalogFilter};
use aibro_core::error::{AibroError, Result};
use aibro_core::saved::SavedPolicyRepository;
use chrono::{Days, NaiveDate};

/// Default number of entries in the ending-soon list.
pub const ENDING_SOON_LIMIT: usize = 3;

/// Default look-ahead of the ending-soon list.
pub const ENDING_SOON_WINDOW_DAYS: u64 = 60;

pub struct BrowseService {
    catalog: Arc<Catalog>,
    saved_repository: Arc<dyn SavedPolicyRepository>,
}

impl BrowseService {
    pub fn new(catalog: Arc<Catalog>, saved_repository: Arc<dyn SavedPolicyRepository>) -> Self {
        Self {
            catalog,
            saved_repository,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Applies `filter` to the whole catalog, keeping catalog order.
    pub fn browse(&self, filter: &CatalogFilter) -> Vec<&Announcement> {
        self.catalog.filter(filter)
    }

    /// Announcements whose deadline falls within `window_days` of `today`,
    /// earliest first.
    ///
    /// Announcements without a parseable deadline never appear.
    pub fn ending_soon(
        &self,
        today: NaiveDate,
        window_days: u64,
        limit: usize,
    ) -> Vec<&Announcement> {
        let until = today
            .checked_add_days(Days::new(window_days))
            .unwrap_or(NaiveDate::MAX);

        let mut due: Vec<(NaiveDate, &Announcement)> = self
            .catalog
            .items()
            .iter()
            .filter_map(|a| a.deadline_date().map(|d| (d, a)))
            .filter(|(d, _)| *d >= today && *d <= until)
            .collect();
        due.sort_by_key(|(d, _)| *d);
        due.into_iter().take(limit).map(|(_, a)| a).collect()
    }

    /// Saved announcements in catalog order.
    ///
    /// Saved ids that are not in the catalog are ignored.
    pub async fn saved_items(&self) -> Result<Vec<&Announcement>> {
        let saved: HashSet<String> = self
            .saved_repository
            .get_saved_ids()
            .await?
            .into_iter()
            .collect();
        Ok(self
            .catalog
            .items()
            .iter()
            .filter(|a| saved.contains(&a.policy_id))
            .collect())
    }

    pub fn detail(&self, policy_id: &str) -> Result<&Announcement> {
        self.catalog
            .get(policy_id)
            .ok_or_else(|| AibroError::not_found("announcement", policy_id))
    }

    pub async fn is_saved(&self, policy_id: &str) -> Result<bool> {
        self.saved_repository.is_saved(policy_id).await
    }

    /// Saves `policy_id` if it isn't saved, unsaves it otherwise.
    ///
    /// Returns whether it is saved afterwards.
    pub async fn toggle_saved(&self, policy_id: &str) -> Result<bool> {
        if self.saved_repository.is_saved(policy_id).await? {
            self.saved_repository.remove_id(policy_id).await?;
            tracing::debug!(policy_id, "Announcement unsaved");
            Ok(false)
        } else {
            self.saved_repository.save_id(policy_id).await?;
            tracing::debug!(policy_id, "Announcement saved");
            Ok(true)
        }
    }
}
