//! Infrastructure layer for AI Bro.
//!
//! Durable store backends, path resolution, configuration files and catalog
//! loading.

pub mod catalog_loader;
pub mod config;
pub mod json_store;
pub mod memory_store;
pub mod paths;
pub mod storage;

pub use catalog_loader::{load_catalog, parse_catalog, seed_catalog};
pub use config::{AppConfig, SecretConfig};
pub use json_store::JsonFileStore;
pub use memory_store::InMemoryStore;
pub use paths::AibroPaths;
