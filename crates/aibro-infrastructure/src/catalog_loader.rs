//! Catalog loading from raw JSON sources.
//!
//! Raw sources are crawl dumps with inconsistent field names, so records go
//! through the normalizer rather than straight deserialization. Accepted
//! layouts are a top-level array or an object wrapping the array under
//! `items` or `data`.

use std::path::Path;

use aibro_core::catalog::Catalog;
use aibro_core::error::{AibroError, Result};
use serde_json::Value;

const SEED_CATALOG: &str = include_str!("../data/seed_catalog.json");

/// Returns the catalog bundled with the binary.
pub fn seed_catalog() -> Result<Catalog> {
    parse_catalog(SEED_CATALOG)
}

/// Loads a catalog from `path`, or the bundled one when `path` is `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return seed_catalog();
    };
    let content = std::fs::read_to_string(path).map_err(|e| {
        AibroError::io(format!("Failed to read catalog {}: {}", path.display(), e))
    })?;
    let catalog = parse_catalog(&content)?;
    tracing::info!(path = %path.display(), items = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// Parses raw catalog JSON text.
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let root: Value = serde_json::from_str(content)?;
    let records = match root {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("items").or_else(|| map.remove("data")) {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(AibroError::Serialization {
                    format: "JSON".to_string(),
                    message: "catalog object has no `items` or `data` array".to_string(),
                });
            }
        },
        _ => {
            return Err(AibroError::Serialization {
                format: "JSON".to_string(),
                message: "catalog must be an array of records".to_string(),
            });
        }
    };

    let skipped = records.iter().filter(|r| !r.is_object()).count();
    if skipped > 0 {
        tracing::warn!(skipped, "Ignoring non-object catalog records");
    }
    let objects: Vec<Value> = records.into_iter().filter(Value::is_object).collect();
    Ok(Catalog::from_raw(&objects))
}
