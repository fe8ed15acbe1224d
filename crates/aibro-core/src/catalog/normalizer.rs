//! Tolerant mapping from raw crawl records to [`Announcement`].
//!
//! Upstream sources disagree on field names, so every logical field has a
//! list of aliases and the first alias carrying a usable value wins.
//! Normalization never fails; missing data only degrades field quality.

use std::str::FromStr;

use serde_json::Value;

use super::model::{Announcement, Category};
use crate::id::{IdProvider, UuidIdProvider};

const ID_KEYS: &[&str] = &["policy_id", "id", "p_id"];
const TITLE_KEYS: &[&str] = &["title", "name"];
const CATEGORY_KEYS: &[&str] = &["category"];
const REGION_KEYS: &[&str] = &["region", "area"];
const TARGET_KEYS: &[&str] = &["target", "eligible"];
const CONTENT_KEYS: &[&str] = &["content", "desc", "description"];
const LINK_KEYS: &[&str] = &["apply_link", "link"];
const DEADLINE_KEYS: &[&str] = &["deadline", "due_date"];

pub const NO_TITLE: &str = "no title";
pub const NO_DESCRIPTION: &str = "no description";
pub const NO_TARGET: &str = "no target information";
pub const UNKNOWN_REGION: &str = "unknown";

/// Normalizes a raw record, generating a synthetic id when none is present.
pub fn normalize(raw: &Value) -> Announcement {
    normalize_with(raw, &UuidIdProvider)
}

/// Same as [`normalize`] with an explicit id source for synthetic ids.
pub fn normalize_with(raw: &Value, ids: &dyn IdProvider) -> Announcement {
    let policy_id = first_text(raw, ID_KEYS).unwrap_or_else(|| synthetic_id(ids));
    let category = first_text(raw, CATEGORY_KEYS)
        .and_then(|c| Category::from_str(c.trim()).ok())
        .unwrap_or_default();

    Announcement {
        policy_id,
        title: first_text(raw, TITLE_KEYS).unwrap_or_else(|| NO_TITLE.to_string()),
        category,
        region: first_text(raw, REGION_KEYS).unwrap_or_else(|| UNKNOWN_REGION.to_string()),
        target: first_text(raw, TARGET_KEYS).unwrap_or_else(|| NO_TARGET.to_string()),
        content: first_text(raw, CONTENT_KEYS).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        apply_link: first_text(raw, LINK_KEYS),
        deadline: first_text(raw, DEADLINE_KEYS),
        score: None,
        reason: None,
        checklist: None,
        risk_note: None,
    }
}

fn synthetic_id(ids: &dyn IdProvider) -> String {
    let raw = ids.next_id().replace('-', "");
    format!("ID_{}", raw)
}

/// Returns the first non-empty string (or number, stringified) among `keys`.
fn first_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
