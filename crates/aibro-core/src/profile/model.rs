//! UserProfile domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{NATIONWIDE, OTHER_INDUSTRY, is_known_industry, is_known_region};
use crate::error::{AibroError, Result};

/// Opening date used by the placeholder profile.
pub const PLACEHOLDER_OPENING_DATE: &str = "2024-01-01";

/// Snapshot of the business owner's attributes.
///
/// Overwritten wholesale from the profile form; the orchestrator only ever
/// reads it and copies it into each new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Region code of the business site
    pub region: String,
    /// Industry category
    pub industry: String,
    /// Number of regular employees (at least 1)
    pub employees: u32,
    /// Opening date, `YYYY-MM-DD`
    pub opening_date: String,
    /// Annual revenue as entered; the unit is not interpreted
    pub revenue: String,
}

impl UserProfile {
    /// The placeholder profile.
    ///
    /// Used as the snapshot of sessions created without a stored profile and
    /// as the initial value of the profile form.
    pub fn placeholder() -> Self {
        Self {
            region: NATIONWIDE.to_string(),
            industry: OTHER_INDUSTRY.to_string(),
            employees: 1,
            opening_date: PLACEHOLDER_OPENING_DATE.to_string(),
            revenue: "0".to_string(),
        }
    }

    /// Checks the constraints enforced by the profile form.
    pub fn validate(&self) -> Result<()> {
        if self.employees == 0 {
            return Err(AibroError::config("employees must be a positive integer"));
        }
        if !is_known_region(&self.region) {
            return Err(AibroError::config(format!(
                "unknown region '{}'",
                self.region
            )));
        }
        if !is_known_industry(&self.industry) {
            return Err(AibroError::config(format!(
                "unknown industry '{}'",
                self.industry
            )));
        }
        if self.opening_date().is_none() {
            return Err(AibroError::config(format!(
                "opening date '{}' is not YYYY-MM-DD",
                self.opening_date
            )));
        }
        Ok(())
    }

    /// Parsed opening date, if it is a valid `YYYY-MM-DD` date.
    pub fn opening_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.opening_date.trim(), "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_profile() {
        let p = UserProfile::placeholder();
        assert_eq!(p.region, "nationwide");
        assert_eq!(p.industry, "other");
        assert_eq!(p.employees, 1);
        assert_eq!(p.revenue, "0");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_employees_and_unknown_region() {
        let mut p = UserProfile::placeholder();
        p.employees = 0;
        assert!(p.validate().is_err());

        let mut p = UserProfile::placeholder();
        p.region = "atlantis".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_validate_checks_industry_and_opening_date() {
        let mut p = UserProfile::placeholder();
        p.industry = "manufacturing".to_string();
        p.opening_date = "2022-06-01".to_string();
        assert!(p.validate().is_ok());
        assert_eq!(p.opening_date(), NaiveDate::from_ymd_opt(2022, 6, 1));

        p.industry = "space mining".to_string();
        assert!(p.validate().is_err());

        let mut p = UserProfile::placeholder();
        p.opening_date = "2022/06/01".to_string();
        assert!(p.validate().is_err());
        p.opening_date = "2023-02-30".to_string();
        assert!(p.validate().is_err());
    }
}
