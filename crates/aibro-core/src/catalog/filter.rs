//! Catalog filtering.
//!
//! A single pure predicate serves both the interactive browse view
//! (category + region + free text) and the narrowing of ranking candidates
//! (profile region + optional fixed category).

use super::constants::NATIONWIDE;
use super::model::{Announcement, Category};

/// How the `region` criterion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionMode {
    /// Browse semantics: a wildcard (or absent) region disables region
    /// filtering; any other region matches itself or the wildcard.
    #[default]
    Browse,
    /// Eligibility semantics: items must be tagged with the region or the
    /// wildcard, even when the region itself is the wildcard.
    Eligible,
}

/// Filter criteria. All present criteria are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<Category>,
    pub region: Option<String>,
    pub search: Option<String>,
    pub region_mode: RegionMode,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria used to narrow the catalog before ranking.
    pub fn for_candidates(region: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            category,
            region: Some(region.into()),
            search: None,
            region_mode: RegionMode::Eligible,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns true if `item` satisfies every present criterion.
    pub fn matches(&self, item: &Announcement) -> bool {
        self.matches_category(item) && self.matches_region(item) && self.matches_search(item)
    }

    fn matches_category(&self, item: &Announcement) -> bool {
        self.category.is_none_or(|c| item.category == c)
    }

    fn matches_region(&self, item: &Announcement) -> bool {
        let Some(region) = self.region.as_deref() else {
            return true;
        };
        if self.region_mode == RegionMode::Browse && region == NATIONWIDE {
            return true;
        }
        item.region == region || item.region == NATIONWIDE
    }

    fn matches_search(&self, item: &Announcement) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let needle = term.to_lowercase();
                item.title.to_lowercase().contains(&needle)
                    || item.content.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Filters `items`, preserving input order.
pub fn filter_announcements<'a, I>(items: I, filter: &CatalogFilter) -> Vec<&'a Announcement>
where
    I: IntoIterator<Item = &'a Announcement>,
{
    items.into_iter().filter(|item| filter.matches(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: Category, region: &str, title: &str, content: &str) -> Announcement {
        Announcement {
            policy_id: id.to_string(),
            title: title.to_string(),
            category,
            region: region.to_string(),
            target: String::new(),
            content: content.to_string(),
            apply_link: None,
            deadline: None,
            score: None,
            reason: None,
            checklist: None,
            risk_note: None,
        }
    }

    fn sample() -> Vec<Announcement> {
        vec![
            item("L001", Category::Loan, NATIONWIDE, "Market Loan", "Low-rate operating funds"),
            item("L002", Category::Loan, "gyeonggi", "Hope Loan", "Guarantee limits"),
            item("Y001", Category::Intermediary, NATIONWIDE, "Tech Guarantee", "No collateral"),
            item("L003", Category::Loan, "seoul", "Emergency Fund", "Sales drop support"),
        ]
    }

    fn ids(items: &[&Announcement]) -> Vec<String> {
        items.iter().map(|a| a.policy_id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let items = sample();
        let result = filter_announcements(&items, &CatalogFilter::new());
        assert_eq!(ids(&result), vec!["L001", "L002", "Y001", "L003"]);
    }

    #[test]
    fn test_region_returns_only_region_or_wildcard() {
        let items = sample();
        let result = filter_announcements(&items, &CatalogFilter::new().with_region("seoul"));
        assert_eq!(ids(&result), vec!["L001", "Y001", "L003"]);
        for a in result {
            assert!(a.region == "seoul" || a.region == NATIONWIDE);
        }
    }

    #[test]
    fn test_browse_wildcard_region_disables_region_filter() {
        let items = sample();
        let result = filter_announcements(&items, &CatalogFilter::new().with_region(NATIONWIDE));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_candidate_filter_with_wildcard_profile_keeps_only_wildcard_items() {
        let items = sample();
        let result = filter_announcements(&items, &CatalogFilter::for_candidates(NATIONWIDE, None));
        assert_eq!(ids(&result), vec!["L001", "Y001"]);
    }

    #[test]
    fn test_category_and_search_are_anded() {
        let items = sample();
        let filter = CatalogFilter::new()
            .with_category(Category::Loan)
            .with_search("LOAN");
        let result = filter_announcements(&items, &filter);
        assert_eq!(ids(&result), vec!["L001", "L002"]);
    }

    #[test]
    fn test_search_matches_content_case_insensitively() {
        let items = sample();
        let result = filter_announcements(&items, &CatalogFilter::new().with_search("COLLATERAL"));
        assert_eq!(ids(&result), vec!["Y001"]);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let items = sample();
        let result = filter_announcements(&items, &CatalogFilter::new().with_search(""));
        assert_eq!(result.len(), 4);
    }
}
