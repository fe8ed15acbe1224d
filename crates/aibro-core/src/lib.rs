//! Domain layer for AI Bro.
//!
//! Holds the catalog, profile and session models, the durable store and
//! ranking oracle contracts, and the pure candidate/merge logic. Nothing in
//! this crate performs I/O.

pub mod catalog;
pub mod error;
pub mod id;
pub mod oracle;
pub mod profile;
pub mod recommendation;
pub mod saved;
pub mod session;
pub mod settings;
pub mod store;

// Re-export common error type
pub use error::{AibroError, Result};
