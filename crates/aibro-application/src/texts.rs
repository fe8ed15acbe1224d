//! Assistant message texts.

use aibro_core::profile::UserProfile;
use aibro_core::session::PLACEHOLDER_TITLE;

/// Reply appended when a recommendation pass fails.
pub const APOLOGY: &str =
    "Sorry, something went wrong while generating recommendations. Please try again.";

/// Welcome message of a new session.
///
/// Without a profile the message asks the user to complete it, since no
/// recommendation can be produced until then.
pub fn welcome(profile: Option<&UserProfile>) -> String {
    match profile {
        Some(p) => format!(
            "Welcome! I'll find policy funds that fit your {} business in {}. What would you like to know?",
            p.industry, p.region
        ),
        None => "Welcome! To get recommendations, please complete your business profile first."
            .to_string(),
    }
}

/// Reply carrying `count` recommendations.
pub fn recommendations_found(count: usize) -> String {
    format!(
        "I found {count} policy fund recommendations for you. Check the scores and checklists below."
    )
}

/// Cleans an oracle-generated title.
///
/// Returns `None` when nothing usable remains, in which case the session
/// keeps its placeholder.
pub fn clean_title(raw: &str) -> Option<String> {
    let cleaned = raw.replace('"', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == PLACEHOLDER_TITLE {
        None
    } else {
        Some(cleaned.to_string())
    }
}
