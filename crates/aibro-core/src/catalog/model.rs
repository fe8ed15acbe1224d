//! Announcement domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Support-program category.
///
/// Parsing accepts both the canonical names and the short labels used by
/// the upstream crawl sources (`yugwan`, `sojingong`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Category {
    /// Loans and guarantees.
    #[default]
    #[strum(to_string = "loan")]
    Loan,
    /// Programs run by intermediary (related) agencies.
    #[serde(alias = "yugwan")]
    #[strum(to_string = "intermediary", serialize = "yugwan")]
    Intermediary,
    /// Programs run by the small-business market agency.
    #[serde(alias = "sojingong")]
    #[strum(to_string = "micro_business_agency", serialize = "sojingong")]
    MicroBusinessAgency,
}

impl Category {
    /// Human-readable label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Loan => "Loan / Guarantee",
            Category::Intermediary => "Related agency",
            Category::MicroBusinessAgency => "Market agency",
        }
    }
}

/// A government financial-support announcement.
///
/// The catalog-derived fields never change after load. The ranking fields
/// (`score`, `reason`, `checklist`, `risk_note`) are only populated on copies
/// produced by a ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Stable identifier, unique within the catalog
    pub policy_id: String,
    pub title: String,
    pub category: Category,
    /// Region code; `nationwide` applies everywhere
    pub region: String,
    /// Eligibility description
    pub target: String,
    pub content: String,
    pub apply_link: Option<String>,
    /// Deadline, usually `YYYY-MM-DD`; `None` means open-ended
    pub deadline: Option<String>,

    /// Fit score in `[0, 100]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_note: Option<String>,
}

impl Announcement {
    /// Returns true if this copy carries ranking annotations.
    pub fn is_ranked(&self) -> bool {
        self.score.is_some()
    }

    /// Parses the deadline as a calendar date.
    ///
    /// Returns `None` for open-ended announcements and for free-form
    /// deadlines that are not `YYYY-MM-DD`.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        self.deadline
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    /// Returns a copy with every ranking field cleared.
    pub fn without_ranking(&self) -> Self {
        Self {
            score: None,
            reason: None,
            checklist: None,
            risk_note: None,
            ..self.clone()
        }
    }
}
