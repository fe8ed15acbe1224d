//! Identifier generation.
//!
//! Session and message identifiers are produced through the [`IdProvider`]
//! capability so that tests can substitute a deterministic sequence.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of unique identifiers.
pub trait IdProvider: Send + Sync {
    /// Returns a fresh identifier, never returned before by this provider.
    fn next_id(&self) -> String;
}

/// Production provider backed by random UUID v4 values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdProvider;

impl IdProvider for UuidIdProvider {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic provider yielding `<prefix>-1`, `<prefix>-2`, ...
///
/// # Examples
///
/// ```
/// use aibro_core::id::{IdProvider, SequentialIdProvider};
///
/// let ids = SequentialIdProvider::new("msg");
/// assert_eq!(ids.next_id(), "msg-1");
/// assert_eq!(ids.next_id(), "msg-2");
/// ```
#[derive(Debug)]
pub struct SequentialIdProvider {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }
}
