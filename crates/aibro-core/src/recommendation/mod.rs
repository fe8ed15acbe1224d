//! Candidate selection and merging of oracle rankings into catalog records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Announcement, Catalog, CatalogFilter, Category};
use crate::oracle::{OracleError, RankingRecord};
use crate::profile::UserProfile;

/// Default upper bound on the number of candidates sent to the oracle.
pub const DEFAULT_CANDIDATE_CAP: usize = 10;

/// What to do with an oracle record whose id is not one of the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMissPolicy {
    /// Drop the record and report its id as unresolved.
    #[default]
    Skip,
    /// Fail the whole merge with [`RecommendError::LookupMiss`].
    Reject,
}

/// Failure of a recommendation pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("oracle returned ids outside the candidate set: {}", .ids.join(", "))]
    LookupMiss { ids: Vec<String> },
}

/// Result of merging oracle records with the catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeOutcome {
    /// Ranked copies of catalog records, best score first
    pub recommendations: Vec<Announcement>,
    /// Oracle ids that matched no candidate (only filled under `Skip`)
    pub unresolved: Vec<String>,
}

/// Narrows the catalog to entries eligible for `profile`, capped to `cap`.
///
/// Eligible means tagged with the profile's region or the nationwide
/// wildcard, and of `category` when one is given. Catalog order is kept.
pub fn build_candidates(
    catalog: &Catalog,
    profile: &UserProfile,
    category: Option<Category>,
    cap: usize,
) -> Vec<Announcement> {
    let filter = CatalogFilter::for_candidates(profile.region.clone(), category);
    catalog
        .filter(&filter)
        .into_iter()
        .take(cap)
        .cloned()
        .collect()
}

/// Overlays oracle annotations on the candidates they name.
///
/// Only ids of `candidates` resolve; anything else, including catalog
/// entries that were never offered, is a lookup miss.
/// The output is sorted by score, descending; ties keep the oracle's order.
/// Repeated ids are merged once, at their first occurrence.
pub fn merge_rankings(
    candidates: &[Announcement],
    records: &[RankingRecord],
    policy: LookupMissPolicy,
) -> Result<MergeOutcome, RecommendError> {
    let mut seen = HashSet::new();
    let mut outcome = MergeOutcome::default();

    for record in records {
        if !seen.insert(record.id.as_str()) {
            tracing::debug!(policy_id = %record.id, "Ignoring repeated oracle record");
            continue;
        }
        match candidates.iter().find(|a| a.policy_id == record.id) {
            Some(found) => outcome.recommendations.push(overlay(found, record)),
            None => outcome.unresolved.push(record.id.clone()),
        }
    }

    if !outcome.unresolved.is_empty() {
        match policy {
            LookupMissPolicy::Reject => {
                return Err(RecommendError::LookupMiss {
                    ids: outcome.unresolved,
                });
            }
            LookupMissPolicy::Skip => {
                tracing::warn!(unresolved = ?outcome.unresolved, "Skipping unresolved oracle records");
            }
        }
    }

    outcome
        .recommendations
        .sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));
    Ok(outcome)
}

fn overlay(found: &Announcement, record: &RankingRecord) -> Announcement {
    let risk_note = record
        .risk_note
        .as_ref()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    Announcement {
        score: Some(clamp_score(record.score)),
        reason: Some(record.reason.clone()),
        checklist: Some(record.checklist.clone()),
        risk_note,
        ..found.without_ranking()
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn score_of(a: &Announcement) -> f64 {
    a.score.unwrap_or(0.0)
}
